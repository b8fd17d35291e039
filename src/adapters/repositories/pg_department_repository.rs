use async_trait::async_trait;
use sqlx::{query_as, QueryBuilder};
use uuid::Uuid;

use crate::{
    application::{
        dto::department_dto::DepartmentDTO, error::ApplicationError,
        repositories::department_repository::DepartmentRepository,
    },
    domain::models::{department::Department, remote::RemoteReference},
};

#[derive(sqlx::FromRow)]
struct DepartmentRow {
    id: Uuid,
    name: String,
    image_reference: Option<String>,
}

impl From<DepartmentRow> for Department {
    fn from(row: DepartmentRow) -> Self {
        Department {
            id: row.id,
            name: row.name,
            image_reference: row.image_reference.map(RemoteReference::new),
        }
    }
}

pub struct PgDepartmentRepository {
    pool: sqlx::PgPool,
}

impl PgDepartmentRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DepartmentRepository for PgDepartmentRepository {
    async fn find(&self, id: Uuid) -> Result<Option<Department>, ApplicationError> {
        let query = "SELECT id, name, image_reference FROM application.departments WHERE id = $1";
        let row: Option<DepartmentRow> = query_as::<_, DepartmentRow>(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApplicationError::Database(e.to_string()))?;
        Ok(row.map(Department::from))
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Department>, ApplicationError> {
        let query =
            "SELECT id, name, image_reference FROM application.departments WHERE name = $1";
        let rows: Vec<DepartmentRow> = query_as::<_, DepartmentRow>(query)
            .bind(name)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ApplicationError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(Department::from).collect())
    }

    async fn list(&self) -> Result<Vec<Department>, ApplicationError> {
        let query = "SELECT id, name, image_reference FROM application.departments";
        let rows: Vec<DepartmentRow> = query_as::<_, DepartmentRow>(query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ApplicationError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(Department::from).collect())
    }

    async fn update(
        &self,
        id: Uuid,
        fields: DepartmentDTO,
    ) -> Result<Option<Department>, ApplicationError> {
        if fields.name.is_none() && fields.image_reference.is_none() {
            return self.find(id).await;
        }

        let mut builder = QueryBuilder::new("UPDATE application.departments SET ");
        let mut separated = builder.separated(", ");
        if let Some(name) = fields.name {
            separated.push("name = ");
            separated.push_bind_unseparated(name);
        }
        if let Some(reference) = fields.image_reference {
            separated.push("image_reference = ");
            separated.push_bind_unseparated(reference.as_str().to_string());
        }
        builder.push(" WHERE id = ");
        builder.push_bind(id);
        builder.push(" RETURNING id, name, image_reference");

        // zero rows means the record vanished between resolve and bind
        let row = builder
            .build_query_as::<DepartmentRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApplicationError::Database(e.to_string()))?;
        Ok(row.map(Department::from))
    }
}
