use axum::extract::FromRef;
use std::sync::Arc;

use crate::{
    application::services::{DepartmentBindingService, IdentityProvider, RemoteStorage},
    domain::config::settings::FileConstraints,
};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub binding_service: Arc<DepartmentBindingService>,
    pub storage_service: Arc<dyn RemoteStorage>,
    pub identity_provider: Arc<dyn IdentityProvider>,
    pub file_constraints: Arc<FileConstraints>,
}
