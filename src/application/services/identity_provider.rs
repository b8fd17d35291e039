use async_trait::async_trait;

use crate::application::error::ApplicationError;

/// Identity-provider collaborator for the user-deletion path.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn delete_user(&self, email: &str) -> Result<(), ApplicationError>;
}
