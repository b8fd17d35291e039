use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    application::{
        dto::department_dto::DepartmentDTO, error::ApplicationError,
        repositories::department_repository::DepartmentRepository,
    },
    domain::models::{
        department::{CachedDepartment, Department},
        remote::RemoteReference,
    },
};

/// Maps inbound department references (id or name) to authoritative records
/// and persists upload results onto them. The in-memory cache is a read
/// optimization only; every write goes through the authoritative store and
/// the cache is refreshed from the store's returned row, never the reverse.
pub struct DepartmentBindingService {
    repository: Arc<dyn DepartmentRepository>,
    cache: RwLock<HashMap<Uuid, CachedDepartment>>,
}

impl DepartmentBindingService {
    pub fn new(repository: Arc<dyn DepartmentRepository>) -> Self {
        Self {
            repository,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Fills the cache from the authoritative store. Called once at startup;
    /// a failure here is non-fatal since lookups fall back to the store.
    pub async fn warm_cache(&self) -> Result<usize, ApplicationError> {
        let departments = self.repository.list().await?;
        let count = departments.len();
        let mut cache = self.cache.write().unwrap();
        cache.clear();
        for department in departments {
            cache.insert(department.id, CachedDepartment::new(department));
        }
        Ok(count)
    }

    /// Resolution order: exact identifier match against the authoritative
    /// store; on a miss, fall back to the name match, since a department's
    /// name may itself look like an id. Zero name hits is `NotFound`; more
    /// than one is `Ambiguous` and the caller must disambiguate by
    /// identifier.
    pub async fn resolve(&self, reference: &str) -> Result<Department, ApplicationError> {
        if let Ok(id) = Uuid::parse_str(reference) {
            if let Some(department) = self.repository.find(id).await? {
                self.cache_put(department.clone());
                return Ok(department);
            }
        }

        let cached_matches = self.name_matches_cached(reference);
        let matches = if cached_matches.is_empty() {
            // cold or stale cache; consult the store before giving up
            let from_store = self.repository.find_by_name(reference).await?;
            for department in &from_store {
                self.cache_put(department.clone());
            }
            from_store
        } else {
            cached_matches
        };

        match matches.len() {
            0 => Err(ApplicationError::NotFound(format!(
                "No department matching '{}'",
                reference
            ))),
            1 => Ok(matches.into_iter().next().unwrap()),
            _ => {
                let ids: Vec<String> = matches.iter().map(|d| d.id.to_string()).collect();
                warn!(name = reference, candidates = ?ids, "Ambiguous department name");
                Err(ApplicationError::Ambiguous(format!(
                    "Department name '{}' matches multiple records ({}); use an id",
                    reference,
                    ids.join(", ")
                )))
            }
        }
    }

    /// Writes the remote reference onto the authoritative record, then
    /// refreshes the cache from the returned row (write-through). Returns
    /// `Conflict` when the record vanished between resolve and bind; the
    /// caller must re-resolve rather than retry blindly.
    pub async fn bind(
        &self,
        department_id: Uuid,
        reference: RemoteReference,
    ) -> Result<Department, ApplicationError> {
        if self.repository.find(department_id).await?.is_none() {
            self.cache_evict(department_id);
            return Err(ApplicationError::Conflict(format!(
                "Department {} was deleted before the upload could be recorded",
                department_id
            )));
        }

        let fields = DepartmentDTO {
            image_reference: Some(reference.clone()),
            ..Default::default()
        };

        match self.repository.update(department_id, fields).await? {
            Some(updated) => {
                info!(department_id = %department_id, reference = %reference, "Image reference bound");
                self.cache_put(updated.clone());
                Ok(updated)
            }
            None => {
                self.cache_evict(department_id);
                Err(ApplicationError::Conflict(format!(
                    "Department {} was deleted before the upload could be recorded",
                    department_id
                )))
            }
        }
    }

    fn name_matches_cached(&self, name: &str) -> Vec<Department> {
        let cache = self.cache.read().unwrap();
        cache
            .values()
            .filter(|entry| entry.department.name == name)
            .map(|entry| {
                debug!(
                    department_id = %entry.department.id,
                    cached_at = %entry.cached_at,
                    "Name lookup served from cache"
                );
                entry.department.clone()
            })
            .collect()
    }

    fn cache_put(&self, department: Department) {
        let mut cache = self.cache.write().unwrap();
        cache.insert(department.id, CachedDepartment::new(department));
    }

    fn cache_evict(&self, id: Uuid) {
        let mut cache = self.cache.write().unwrap();
        cache.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// In-memory stand-in for the authoritative store.
    struct MemoryRepository {
        rows: Mutex<HashMap<Uuid, Department>>,
    }

    impl MemoryRepository {
        fn new(departments: Vec<Department>) -> Self {
            Self {
                rows: Mutex::new(departments.into_iter().map(|d| (d.id, d)).collect()),
            }
        }

        fn delete(&self, id: Uuid) {
            self.rows.lock().unwrap().remove(&id);
        }
    }

    #[async_trait]
    impl DepartmentRepository for MemoryRepository {
        async fn find(&self, id: Uuid) -> Result<Option<Department>, ApplicationError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn find_by_name(&self, name: &str) -> Result<Vec<Department>, ApplicationError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|d| d.name == name)
                .cloned()
                .collect())
        }

        async fn list(&self) -> Result<Vec<Department>, ApplicationError> {
            Ok(self.rows.lock().unwrap().values().cloned().collect())
        }

        async fn update(
            &self,
            id: Uuid,
            fields: DepartmentDTO,
        ) -> Result<Option<Department>, ApplicationError> {
            let mut rows = self.rows.lock().unwrap();
            Ok(rows.get_mut(&id).map(|row| {
                if let Some(name) = fields.name {
                    row.name = name;
                }
                if let Some(reference) = fields.image_reference {
                    row.image_reference = Some(reference);
                }
                row.clone()
            }))
        }
    }

    fn department(name: &str) -> Department {
        Department {
            id: Uuid::new_v4(),
            name: name.to_string(),
            image_reference: None,
        }
    }

    #[tokio::test]
    async fn resolves_by_id_even_when_names_collide() {
        let a = department("Engineering");
        let b = department("Engineering");
        let service = DepartmentBindingService::new(Arc::new(MemoryRepository::new(vec![
            a.clone(),
            b.clone(),
        ])));

        let resolved = service.resolve(&a.id.to_string()).await.unwrap();
        assert_eq!(resolved.id, a.id);
        let resolved = service.resolve(&b.id.to_string()).await.unwrap();
        assert_eq!(resolved.id, b.id);
    }

    #[tokio::test]
    async fn duplicate_names_resolve_to_ambiguous() {
        let service = DepartmentBindingService::new(Arc::new(MemoryRepository::new(vec![
            department("Engineering"),
            department("Engineering"),
        ])));
        service.warm_cache().await.unwrap();

        assert!(matches!(
            service.resolve("Engineering").await,
            Err(ApplicationError::Ambiguous(_))
        ));
    }

    #[tokio::test]
    async fn unknown_name_is_not_found() {
        let service = DepartmentBindingService::new(Arc::new(MemoryRepository::new(vec![
            department("Engineering"),
        ])));
        service.warm_cache().await.unwrap();

        assert!(matches!(
            service.resolve("Marketing").await,
            Err(ApplicationError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn cold_cache_falls_back_to_the_store() {
        let dept = department("Engineering");
        let service =
            DepartmentBindingService::new(Arc::new(MemoryRepository::new(vec![dept.clone()])));
        // no warm_cache

        let resolved = service.resolve("Engineering").await.unwrap();
        assert_eq!(resolved.id, dept.id);
    }

    #[tokio::test]
    async fn bind_round_trips_through_the_authoritative_store() {
        let dept = department("Engineering");
        let repository = Arc::new(MemoryRepository::new(vec![dept.clone()]));
        let service = DepartmentBindingService::new(Arc::clone(&repository) as Arc<dyn DepartmentRepository>);

        let reference = RemoteReference::new("department-images/engineering.png");
        service.bind(dept.id, reference.clone()).await.unwrap();

        let stored = repository.find(dept.id).await.unwrap().unwrap();
        assert_eq!(stored.image_reference, Some(reference.clone()));

        // write-through: the cache serves the updated record
        let resolved = service.resolve("Engineering").await.unwrap();
        assert_eq!(resolved.image_reference, Some(reference));
    }

    #[tokio::test]
    async fn bind_after_concurrent_delete_is_a_conflict() {
        let dept = department("Engineering");
        let repository = Arc::new(MemoryRepository::new(vec![dept.clone()]));
        let service = DepartmentBindingService::new(Arc::clone(&repository) as Arc<dyn DepartmentRepository>);
        service.warm_cache().await.unwrap();

        repository.delete(dept.id);

        assert!(matches!(
            service
                .bind(dept.id, RemoteReference::new("department-images/x.png"))
                .await,
            Err(ApplicationError::Conflict(_))
        ));
        // the stale cache entry is evicted, so a re-resolve sees the truth
        assert!(matches!(
            service.resolve("Engineering").await,
            Err(ApplicationError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn uuid_shaped_name_falls_back_to_name_match() {
        let mut dept = department("placeholder");
        dept.name = Uuid::new_v4().to_string();
        let service =
            DepartmentBindingService::new(Arc::new(MemoryRepository::new(vec![dept.clone()])));
        service.warm_cache().await.unwrap();

        // the reference parses as an id but matches no record by id
        let resolved = service.resolve(&dept.name).await.unwrap();
        assert_eq!(resolved.id, dept.id);
    }

    #[tokio::test]
    async fn dead_id_with_no_matching_name_is_not_found() {
        let dept = department("Engineering");
        let repository = Arc::new(MemoryRepository::new(vec![dept.clone()]));
        let service = DepartmentBindingService::new(Arc::clone(&repository) as Arc<dyn DepartmentRepository>);
        service.warm_cache().await.unwrap();

        repository.delete(dept.id);

        assert!(matches!(
            service.resolve(&dept.id.to_string()).await,
            Err(ApplicationError::NotFound(_))
        ));
    }
}
