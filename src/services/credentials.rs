use crate::{domain::config::secrets::StorageCredentials, services::error::StorageError};

const MIN_SECRET_LEN: usize = 16;

/// Validates credential presence and shape before any network attempt.
/// Synchronous, no I/O; a failure here is a configuration problem, not an
/// outage, and must stay distinguishable from one.
pub fn validate_credentials(credentials: &StorageCredentials) -> Result<(), StorageError> {
    if credentials.endpoint.trim().is_empty() {
        return Err(StorageError::MissingCredentials(
            "storage endpoint is not set".to_string(),
        ));
    }
    if credentials.access_key_id.trim().is_empty() {
        return Err(StorageError::MissingCredentials(
            "storage access key id is not set".to_string(),
        ));
    }
    if credentials.secret_access_key.trim().is_empty() {
        return Err(StorageError::MissingCredentials(
            "storage secret access key is not set".to_string(),
        ));
    }
    if credentials.bucket_name.trim().is_empty() {
        return Err(StorageError::MissingCredentials(
            "storage bucket name is not set".to_string(),
        ));
    }

    if !credentials.endpoint.starts_with("http://") && !credentials.endpoint.starts_with("https://")
    {
        return Err(StorageError::MalformedCredentials(
            "storage endpoint must be an http(s) URL".to_string(),
        ));
    }
    if credentials.secret_access_key.len() < MIN_SECRET_LEN {
        return Err(StorageError::MalformedCredentials(format!(
            "storage secret access key shorter than {} characters",
            MIN_SECRET_LEN
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn well_formed() -> StorageCredentials {
        StorageCredentials {
            endpoint: "https://storage.example.com".to_string(),
            access_key_id: "AKIAEXAMPLE".to_string(),
            secret_access_key: "0123456789abcdef0123".to_string(),
            bucket_name: "department-images".to_string(),
            account_id: None,
        }
    }

    #[test]
    fn well_formed_credentials_pass() {
        assert!(validate_credentials(&well_formed()).is_ok());
    }

    #[test]
    fn each_missing_field_is_reported_as_missing() {
        for strip in [
            |c: &mut StorageCredentials| c.endpoint.clear(),
            |c: &mut StorageCredentials| c.access_key_id.clear(),
            |c: &mut StorageCredentials| c.secret_access_key.clear(),
            |c: &mut StorageCredentials| c.bucket_name.clear(),
        ] {
            let mut creds = well_formed();
            strip(&mut creds);
            assert!(matches!(
                validate_credentials(&creds),
                Err(StorageError::MissingCredentials(_))
            ));
        }
    }

    #[test]
    fn short_secret_is_malformed_not_missing() {
        let mut creds = well_formed();
        creds.secret_access_key = "short".to_string();
        assert!(matches!(
            validate_credentials(&creds),
            Err(StorageError::MalformedCredentials(_))
        ));
    }

    #[test]
    fn non_http_endpoint_is_malformed() {
        let mut creds = well_formed();
        creds.endpoint = "ftp://storage.example.com".to_string();
        assert!(matches!(
            validate_credentials(&creds),
            Err(StorageError::MalformedCredentials(_))
        ));
    }
}
