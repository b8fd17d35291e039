use thiserror::Error;

use crate::application::error::ApplicationError;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Malformed credentials: {0}")]
    MalformedCredentials(String),

    #[error("Invalid destination path: {0}")]
    InvalidDestination(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),

    #[error("Authentication rejected: {0}")]
    AuthRejected(String),

    #[error("Session expired")]
    SessionExpired,

    #[error("Storage quota exceeded")]
    QuotaExceeded,

    #[error("Storage provider error: {0}")]
    Provider(String),

    #[error("Giving up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<StorageError>,
    },
}

impl StorageError {
    /// Errors expected to potentially succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StorageError::Timeout
                | StorageError::Network(_)
                | StorageError::Unavailable(_)
                | StorageError::SessionExpired
        )
    }

    /// Whether the cached Session must be discarded before the next attempt.
    pub fn invalidates_session(&self) -> bool {
        matches!(self, StorageError::SessionExpired)
    }
}

impl From<StorageError> for ApplicationError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::MissingCredentials(msg) | StorageError::MalformedCredentials(msg) => {
                ApplicationError::Configuration(msg)
            }
            StorageError::InvalidDestination(msg) => ApplicationError::Validation(format!(
                "Invalid destination path: {}",
                msg
            )),
            StorageError::RetriesExhausted { attempts, last } => {
                if last.is_transient() {
                    ApplicationError::Transient(format!(
                        "Upload failed after {} attempts: {}",
                        attempts, last
                    ))
                } else {
                    ApplicationError::PermanentRemote(last.to_string())
                }
            }
            e if e.is_transient() => ApplicationError::Transient(e.to_string()),
            e => ApplicationError::PermanentRemote(e.to_string()),
        }
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            StorageError::Timeout
        } else if error.is_connect() {
            StorageError::Network(format!("Connection failed: {}", error))
        } else if let Some(status) = error.status() {
            match status.as_u16() {
                401 | 403 => StorageError::AuthRejected(error.to_string()),
                429 | 507 => StorageError::QuotaExceeded,
                s if s >= 500 => StorageError::Unavailable(error.to_string()),
                _ => StorageError::Provider(error.to_string()),
            }
        } else {
            StorageError::Network(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_and_resets_are_transient() {
        assert!(StorageError::Timeout.is_transient());
        assert!(StorageError::Network("reset".into()).is_transient());
        assert!(StorageError::Unavailable("503".into()).is_transient());
    }

    #[test]
    fn auth_and_quota_are_permanent() {
        assert!(!StorageError::AuthRejected("denied".into()).is_transient());
        assert!(!StorageError::QuotaExceeded.is_transient());
        assert!(!StorageError::MissingCredentials("endpoint".into()).is_transient());
    }

    #[test]
    fn only_expired_sessions_force_reconnect() {
        assert!(StorageError::SessionExpired.invalidates_session());
        assert!(!StorageError::Timeout.invalidates_session());
        assert!(!StorageError::AuthRejected("denied".into()).invalidates_session());
    }
}
