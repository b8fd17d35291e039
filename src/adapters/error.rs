use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use crate::application::error::ApplicationError;

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            ApplicationError::Configuration(ref msg) => {
                error!("Service misconfigured: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "configuration",
                    "Service misconfigured".to_string(),
                )
            }
            ApplicationError::Validation(msg) => {
                warn!("Validation failed: {}", msg);
                (StatusCode::BAD_REQUEST, "validation", msg)
            }
            ApplicationError::PayloadTooLarge => {
                warn!("File too large");
                (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "validation",
                    "File too large".to_string(),
                )
            }
            ApplicationError::NotFound(msg) => {
                warn!("Resolution failed: {}", msg);
                (StatusCode::NOT_FOUND, "not_found", msg)
            }
            ApplicationError::Ambiguous(msg) => {
                warn!("Ambiguous reference: {}", msg);
                (StatusCode::CONFLICT, "ambiguous", msg)
            }
            ApplicationError::Conflict(msg) => {
                warn!("Binding conflict: {}", msg);
                (StatusCode::CONFLICT, "conflict", msg)
            }
            ApplicationError::Transient(ref msg) => {
                warn!("Transient remote failure: {}", msg);
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "transient",
                    "Storage backend unavailable, try again later".to_string(),
                )
            }
            ApplicationError::PermanentRemote(ref msg) => {
                error!("Permanent remote failure: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "permanent",
                    "Storage backend rejected the request".to_string(),
                )
            }
            ApplicationError::Unauthorized => {
                warn!("Unauthorized");
                (
                    StatusCode::UNAUTHORIZED,
                    "unauthorized",
                    "Unauthorized".to_string(),
                )
            }
            ApplicationError::Database(ref msg) => {
                error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "errorKind": kind,
            "message": message,
        }));

        (status, body).into_response()
    }
}
