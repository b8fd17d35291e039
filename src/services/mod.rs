mod connection;
mod credentials;
mod error;
mod identity;
mod retry;
mod transport;
mod uploader;

pub use error::StorageError;
pub use identity::HttpIdentityProvider;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    application::{error::ApplicationError, services::RemoteStorage},
    domain::{
        config::{secrets::StorageCredentials, settings::UploadSettings},
        models::{file::ImageData, remote::RemoteReference},
    },
    services::{
        connection::ConnectionManager, retry::RetryPolicy, transport::HttpStorageTransport,
        uploader::UploadExecutor,
    },
};

/// The resilient upload pipeline behind the `RemoteStorage` seam:
/// credential gate, shared session, retrying executor.
pub struct StorageClient {
    executor: UploadExecutor,
}

#[async_trait]
impl RemoteStorage for StorageClient {
    async fn upload_image(
        &self,
        destination: &str,
        image: ImageData,
    ) -> Result<RemoteReference, ApplicationError> {
        let outcome = self.executor.upload(destination, &image).await?;
        Ok(outcome.reference)
    }
}

/// Validates credentials before any transport is built; a configuration
/// problem surfaces here, at startup, not as a fake network failure later.
pub fn create_storage_client(
    credentials: StorageCredentials,
    settings: &UploadSettings,
) -> Result<Arc<dyn RemoteStorage>, StorageError> {
    credentials::validate_credentials(&credentials)?;

    let transport = Arc::new(HttpStorageTransport::new(credentials));
    let connection = Arc::new(ConnectionManager::new(
        Arc::clone(&transport) as Arc<dyn transport::StorageTransport>,
        RetryPolicy::new(settings.connect_max_attempts, settings.connect_base_delay),
        settings.connect_timeout,
    ));
    let executor = UploadExecutor::new(
        connection,
        transport,
        RetryPolicy::new(settings.upload_max_attempts, settings.connect_base_delay),
        settings.upload_timeout,
    );

    Ok(Arc::new(StorageClient { executor }))
}
