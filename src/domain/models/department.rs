use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::remote::RemoteReference;

/// Authoritative department record. `id` is assigned at creation and never
/// reused; `name` is mutable and not guaranteed unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "imageReference")]
    pub image_reference: Option<RemoteReference>,
}

/// Read-optimized copy held by the in-memory cache. Always treated as
/// possibly stale; `cached_at` records when it was last refreshed from the
/// authoritative store.
#[derive(Debug, Clone)]
pub struct CachedDepartment {
    pub department: Department,
    pub cached_at: DateTime<Utc>,
}

impl CachedDepartment {
    pub fn new(department: Department) -> Self {
        Self {
            department,
            cached_at: Utc::now(),
        }
    }
}
