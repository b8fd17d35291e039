use std::sync::Arc;

use axum::{extract::State, Json};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use crate::{
    adapters::dto::user_dto::{DeleteUserRequest, DeleteUserResponse},
    application::{error::ApplicationError, services::IdentityProvider},
};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub struct UserController;

impl UserController {
    /// DELETE /api/v1/users
    /// Body: {"email": "..."}. The email is validated locally before the
    /// identity provider is contacted.
    pub async fn delete_user(
        State(identity_provider): State<Arc<dyn IdentityProvider>>,
        Json(body): Json<DeleteUserRequest>,
    ) -> Result<Json<DeleteUserResponse>, ApplicationError> {
        validate_email(&body.email)?;

        identity_provider.delete_user(&body.email).await?;
        info!("Deleted identity-provider account");

        Ok(Json(DeleteUserResponse { success: true }))
    }
}

fn validate_email(email: &str) -> Result<(), ApplicationError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(ApplicationError::Validation(
            "Invalid email address".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plausible_addresses_pass() {
        for email in ["ops@example.com", "a.b+c@sub.domain.org"] {
            assert!(validate_email(email).is_ok(), "{email}");
        }
    }

    #[test]
    fn malformed_addresses_are_rejected_locally() {
        for email in ["", "no-at-sign", "two@@example.com", "spaces in@example.com", "no-dot@example"] {
            assert!(validate_email(email).is_err(), "{email}");
        }
    }
}
