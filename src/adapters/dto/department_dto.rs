use serde::Serialize;

#[derive(Serialize)]
pub struct UploadImageResponse {
    pub success: bool,
    #[serde(rename = "remoteReference")]
    pub remote_reference: String,
}
