use async_trait::async_trait;

use crate::{
    application::error::ApplicationError,
    domain::models::{file::ImageData, remote::RemoteReference},
};

#[async_trait]
pub trait RemoteStorage: Send + Sync {
    /// Transfers `image` to `destination` and returns the locator of the
    /// stored object. Retries and timeouts happen behind this seam; the
    /// caller sees exactly one terminal result.
    async fn upload_image(
        &self,
        destination: &str,
        image: ImageData,
    ) -> Result<RemoteReference, ApplicationError>;
}
