#[derive(Debug, Clone)]
pub struct ImageData {
    pub content: Vec<u8>,
    pub filename: String,
    pub mime_type: String,
}

impl ImageData {
    pub fn new(content: Vec<u8>, filename: String, mime_type: String) -> Self {
        Self {
            content,
            filename,
            mime_type,
        }
    }

    pub fn validate_size(&self, max_size: u64) -> bool {
        (self.content.len() as u64) <= max_size
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_limit_is_inclusive() {
        let image = ImageData::new(vec![0u8; 1024], "logo.png".into(), "image/png".into());
        assert!(image.validate_size(1024));
        assert!(!image.validate_size(1023));
    }
}
