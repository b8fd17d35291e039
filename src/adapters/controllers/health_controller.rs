use axum::Json;
use serde_json::{json, Value};

pub struct HealthController;

impl HealthController {
    /// GET /api/v1/health
    pub async fn health_check() -> Json<Value> {
        Json(json!({ "status": "ok" }))
    }
}
