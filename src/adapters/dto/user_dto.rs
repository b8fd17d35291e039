use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct DeleteUserRequest {
    pub email: String,
}

#[derive(Serialize)]
pub struct DeleteUserResponse {
    pub success: bool,
}
