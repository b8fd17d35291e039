use std::time::Duration;

const DEFAULT_MAX_UPLOAD_SIZE: u64 = 5 * 1024 * 1024;

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_u32(name: &str, default: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Retry/timeout tunables for the upload pipeline.
#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub connect_max_attempts: u32,
    pub connect_base_delay: Duration,
    pub connect_timeout: Duration,
    pub upload_max_attempts: u32,
    pub upload_timeout: Duration,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            connect_max_attempts: 3,
            connect_base_delay: Duration::from_millis(200),
            connect_timeout: Duration::from_secs(10),
            upload_max_attempts: 3,
            upload_timeout: Duration::from_secs(30),
        }
    }
}

impl UploadSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            connect_max_attempts: env_u32(
                "CONNECT_MAX_ATTEMPTS",
                defaults.connect_max_attempts,
            ),
            connect_base_delay: Duration::from_millis(env_u64(
                "CONNECT_BASE_DELAY_MS",
                defaults.connect_base_delay.as_millis() as u64,
            )),
            connect_timeout: Duration::from_secs(env_u64(
                "CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout.as_secs(),
            )),
            upload_max_attempts: env_u32("UPLOAD_MAX_ATTEMPTS", defaults.upload_max_attempts),
            upload_timeout: Duration::from_secs(env_u64(
                "UPLOAD_TIMEOUT_SECS",
                defaults.upload_timeout.as_secs(),
            )),
        }
    }
}

/// File constraints enforced at the HTTP boundary, before the upload core.
#[derive(Debug, Clone)]
pub struct FileConstraints {
    pub max_size: u64,
    pub allowed_mime_types: Vec<String>,
}

impl Default for FileConstraints {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_UPLOAD_SIZE,
            allowed_mime_types: vec![
                "image/png".to_string(),
                "image/jpeg".to_string(),
                "image/webp".to_string(),
                "image/gif".to_string(),
            ],
        }
    }
}

impl FileConstraints {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let allowed_mime_types = match std::env::var("ALLOWED_MIME_TYPES") {
            Ok(list) => list.split(',').map(|s| s.trim().to_string()).collect(),
            Err(_) => defaults.allowed_mime_types,
        };
        Self {
            max_size: env_u64("MAX_UPLOAD_SIZE", defaults.max_size),
            allowed_mime_types,
        }
    }

    pub fn allows_mime(&self, mime_type: &str) -> bool {
        self.allowed_mime_types.iter().any(|m| m == mime_type)
    }
}
