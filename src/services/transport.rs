use async_trait::async_trait;
use reqwest::{multipart, Client, StatusCode};
use serde::Deserialize;

use crate::{
    domain::{
        config::secrets::StorageCredentials,
        models::{file::ImageData, remote::RemoteReference},
    },
    services::error::StorageError,
};

/// Wire-level seam between the upload pipeline and the storage backend.
/// The pipeline only ever sees this trait; tests substitute scripted
/// implementations.
#[async_trait]
pub trait StorageTransport: Send + Sync {
    /// Exchanges credentials for a bearer token. One call per session
    /// establishment attempt.
    async fn connect(&self) -> Result<String, StorageError>;

    /// Transfers `image` to `destination` under the given session token.
    async fn put_object(
        &self,
        token: &str,
        destination: &str,
        image: &ImageData,
    ) -> Result<RemoteReference, StorageError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct PutObjectResponse {
    key: Option<String>,
}

pub struct HttpStorageTransport {
    client: Client,
    endpoint: String,
    access_key_id: String,
    secret_access_key: String,
    bucket_name: String,
}

impl HttpStorageTransport {
    pub fn new(credentials: StorageCredentials) -> Self {
        Self {
            client: Client::new(),
            endpoint: credentials.endpoint.trim_end_matches('/').to_string(),
            access_key_id: credentials.access_key_id,
            secret_access_key: credentials.secret_access_key,
            bucket_name: credentials.bucket_name,
        }
    }
}

#[async_trait]
impl StorageTransport for HttpStorageTransport {
    async fn connect(&self) -> Result<String, StorageError> {
        let url = format!("{}/auth/session", self.endpoint);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "accessKeyId": self.access_key_id,
                "secretAccessKey": self.secret_access_key,
            }))
            .send()
            .await
            .map_err(StorageError::from)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StorageError::AuthRejected(format!(
                "session request rejected with status {}",
                status
            )));
        }
        if status.is_server_error() {
            return Err(StorageError::Unavailable(format!(
                "session request failed with status {}",
                status
            )));
        }
        if !status.is_success() {
            return Err(StorageError::Provider(format!(
                "session request failed with status {}",
                status
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| StorageError::Provider(format!("malformed session response: {}", e)))?;

        Ok(token_response.access_token)
    }

    async fn put_object(
        &self,
        token: &str,
        destination: &str,
        image: &ImageData,
    ) -> Result<RemoteReference, StorageError> {
        let file_part = multipart::Part::bytes(image.content.clone())
            .file_name(image.filename.clone())
            .mime_str(&image.mime_type)
            .map_err(|e| StorageError::Provider(e.to_string()))?;

        let form = multipart::Form::new().part("file", file_part);

        let url = format!(
            "{}/object/{}/{}",
            self.endpoint, self.bucket_name, destination
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .map_err(StorageError::from)?;

        let status = response.status();
        // 401 mid-transfer means the session went stale, not that the
        // credentials are bad; the executor reconnects and retries.
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StorageError::SessionExpired);
        }
        if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::INSUFFICIENT_STORAGE {
            return Err(StorageError::QuotaExceeded);
        }
        if status.is_server_error() {
            return Err(StorageError::Unavailable(format!(
                "upload failed with status {}",
                status
            )));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(StorageError::Provider(format!(
                "upload failed: {}",
                error_text
            )));
        }

        let body: PutObjectResponse = response.json().await.unwrap_or(PutObjectResponse {
            key: None,
        });

        let locator = body
            .key
            .unwrap_or_else(|| format!("{}/{}", self.bucket_name, destination));

        Ok(RemoteReference::new(locator))
    }
}
