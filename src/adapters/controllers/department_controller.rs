use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info, warn};

use crate::{
    adapters::{dto::department_dto::UploadImageResponse, state::AppState},
    application::{error::ApplicationError, services::DepartmentBindingService},
    domain::{
        config::settings::FileConstraints,
        models::{department::Department, file::ImageData},
    },
};

pub struct DepartmentController;

impl DepartmentController {
    /// GET /api/v1/departments/{reference}
    /// `reference` is a department id or name.
    pub async fn get_department(
        State(binding_service): State<Arc<DepartmentBindingService>>,
        Path(reference): Path<String>,
    ) -> Result<Json<Department>, ApplicationError> {
        let department = binding_service.resolve(&reference).await?;
        Ok(Json(department))
    }

    /// POST /api/v1/departments/{reference}/image
    /// Multipart body: `file` bytes plus `filename` and `mime_type` fields.
    pub async fn upload_image(
        State(app_state): State<AppState>,
        Path(reference): Path<String>,
        mut multipart: Multipart,
    ) -> Result<(StatusCode, Json<UploadImageResponse>), ApplicationError> {
        // resolve before reading the body so an unknown department fails fast
        let department = app_state.binding_service.resolve(&reference).await?;

        let mut file_bytes: Option<Vec<u8>> = None;
        let mut filename: Option<String> = None;
        let mut mime_type: Option<String> = None;

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            warn!("Invalid multipart data: {}", e);
            ApplicationError::Validation("Invalid request format".to_string())
        })? {
            let name = field.name().unwrap_or("").to_string();

            match name.as_str() {
                "file" => {
                    file_bytes = Some(
                        field
                            .bytes()
                            .await
                            .map_err(|e| {
                                warn!("Cannot read file bytes: {}", e);
                                ApplicationError::Validation("Invalid file data".to_string())
                            })?
                            .to_vec(),
                    );
                }
                "filename" => {
                    filename = Some(field.text().await.map_err(|e| {
                        warn!("Invalid filename field: {}", e);
                        ApplicationError::Validation("Invalid request data".to_string())
                    })?);
                }
                "mime_type" => {
                    mime_type = Some(field.text().await.map_err(|e| {
                        warn!("Invalid mime_type field: {}", e);
                        ApplicationError::Validation("Invalid request data".to_string())
                    })?);
                }
                _ => {}
            }
        }

        let file_bytes = file_bytes.ok_or_else(|| {
            ApplicationError::Validation("Missing required 'file' field".to_string())
        })?;
        let filename = filename.ok_or_else(|| {
            ApplicationError::Validation("Missing required 'filename' field".to_string())
        })?;
        let mime_type = mime_type.ok_or_else(|| {
            ApplicationError::Validation("Missing required 'mime_type' field".to_string())
        })?;

        let image = ImageData::new(file_bytes, filename, mime_type);
        validate_image(&image, &app_state.file_constraints)?;

        let destination = format!(
            "departments/{}/{}",
            department.id,
            sanitize_filename(&image.filename)
        );

        info!(
            department_id = %department.id,
            destination = %destination,
            bytes = image.size(),
            "Uploading department image"
        );

        let remote_reference = app_state
            .storage_service
            .upload_image(&destination, image)
            .await?;

        // A bind failure here orphans the uploaded object; log the locator
        // so an operator can reconcile it.
        if let Err(e) = app_state
            .binding_service
            .bind(department.id, remote_reference.clone())
            .await
        {
            error!(
                department_id = %department.id,
                reference = %remote_reference,
                "Upload succeeded but binding failed; remote object is orphaned"
            );
            return Err(e);
        }

        Ok((
            StatusCode::CREATED,
            Json(UploadImageResponse {
                success: true,
                remote_reference: remote_reference.to_string(),
            }),
        ))
    }
}

/// Size and mime checks run before the upload core; violations never reach
/// the network.
fn validate_image(
    image: &ImageData,
    constraints: &FileConstraints,
) -> Result<(), ApplicationError> {
    if !constraints.allows_mime(&image.mime_type) {
        return Err(ApplicationError::Validation(format!(
            "MIME type '{}' not allowed",
            image.mime_type
        )));
    }
    if !image.validate_size(constraints.max_size) {
        return Err(ApplicationError::PayloadTooLarge);
    }
    Ok(())
}

fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
