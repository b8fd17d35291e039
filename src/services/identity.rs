use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::{
    application::{error::ApplicationError, services::identity_provider::IdentityProvider},
    domain::config::secrets::IdentitySecrets,
};

/// HTTP client for the identity provider's user-deletion endpoint.
pub struct HttpIdentityProvider {
    client: Client,
    base_url: String,
    service_token: String,
}

impl HttpIdentityProvider {
    pub fn new(secrets: IdentitySecrets) -> Result<Self, ApplicationError> {
        if secrets.base_url.trim().is_empty() || secrets.service_token.trim().is_empty() {
            return Err(ApplicationError::Configuration(
                "identity provider base URL or service token is not set".to_string(),
            ));
        }
        Ok(Self {
            client: Client::new(),
            base_url: secrets.base_url.trim_end_matches('/').to_string(),
            service_token: secrets.service_token,
        })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn delete_user(&self, email: &str) -> Result<(), ApplicationError> {
        let url = format!("{}/users", self.base_url);

        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.service_token)
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    ApplicationError::Transient(format!("Identity provider unreachable: {}", e))
                } else {
                    ApplicationError::PermanentRemote(e.to_string())
                }
            })?;

        let status = response.status();
        match status {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(ApplicationError::NotFound(format!(
                "No account for '{}'",
                email
            ))),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(ApplicationError::Unauthorized)
            }
            s if s.is_server_error() => Err(ApplicationError::Transient(format!(
                "Identity provider returned status {}",
                s
            ))),
            s => Err(ApplicationError::PermanentRemote(format!(
                "Identity provider returned status {}",
                s
            ))),
        }
    }
}
