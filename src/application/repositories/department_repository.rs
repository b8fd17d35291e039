use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    application::{dto::department_dto::DepartmentDTO, error::ApplicationError},
    domain::models::department::Department,
};

/// Authoritative department store. The resolver never mutates it except
/// through `update`.
#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<Department>, ApplicationError>;
    async fn find_by_name(&self, name: &str) -> Result<Vec<Department>, ApplicationError>;
    async fn list(&self) -> Result<Vec<Department>, ApplicationError>;
    /// Returns `None` when the record no longer exists, so callers can
    /// distinguish a lost race from a write failure.
    async fn update(
        &self,
        id: Uuid,
        fields: DepartmentDTO,
    ) -> Result<Option<Department>, ApplicationError>;
}
