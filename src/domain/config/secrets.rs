use serde::{Deserialize, Serialize};

/// Remote-storage credentials. Loaded once at startup, never mutated.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageCredentials {
    #[serde(rename = "endpoint")]
    pub endpoint: String,
    #[serde(rename = "accessKeyId")]
    pub access_key_id: String,
    #[serde(rename = "secretAccessKey")]
    pub secret_access_key: String,
    #[serde(rename = "bucketName")]
    pub bucket_name: String,
    #[serde(rename = "accountId")]
    pub account_id: Option<String>,
}

impl StorageCredentials {
    pub fn from_env() -> Self {
        Self {
            endpoint: std::env::var("STORAGE_ENDPOINT").unwrap_or_default(),
            access_key_id: std::env::var("STORAGE_ACCESS_KEY_ID").unwrap_or_default(),
            secret_access_key: std::env::var("STORAGE_SECRET_ACCESS_KEY").unwrap_or_default(),
            bucket_name: std::env::var("STORAGE_BUCKET").unwrap_or_default(),
            account_id: std::env::var("STORAGE_ACCOUNT_ID").ok(),
        }
    }
}

/// Identity-provider connection details for the user-deletion path.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IdentitySecrets {
    #[serde(rename = "baseUrl")]
    pub base_url: String,
    #[serde(rename = "serviceToken")]
    pub service_token: String,
}

impl IdentitySecrets {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("IDENTITY_BASE_URL").unwrap_or_default(),
            service_token: std::env::var("IDENTITY_SERVICE_TOKEN").unwrap_or_default(),
        }
    }
}
