use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::features::classification::dtos::{ClassificationResultDto, ClassifyImageDto};
use crate::features::classification::services::ClassificationService;
use crate::shared::constants::{is_image_type_allowed, ALLOWED_IMAGE_TYPES, MAX_UPLOAD_SIZE};
use crate::shared::types::ApiResponse;

/// Classify a report photo
///
/// Accepts multipart/form-data with an `image` field. The photo is stored
/// and a category is suggested from its content.
#[utoipa::path(
    post,
    path = "/api/classify",
    request_body(
        content = ClassifyImageDto,
        content_type = "multipart/form-data",
        description = "Form with a single `image` field (jpeg, png or webp)",
    ),
    responses(
        (status = 200, description = "Photo classified", body = ApiResponse<ClassificationResultDto>),
        (status = 400, description = "Missing or invalid image"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Classifier unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "classification"
)]
pub async fn classify_image(
    State(service): State<Arc<ClassificationService>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<ClassificationResultDto>>> {
    let mut image_data: Option<Vec<u8>> = None;
    let mut content_type: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "image" => {
                let ct = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read image bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read image data: {}", e))
                })?;

                image_data = Some(data.to_vec());
                content_type = Some(ct);
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let image_data =
        image_data.ok_or_else(|| AppError::BadRequest("Image is required".to_string()))?;
    let content_type =
        content_type.ok_or_else(|| AppError::BadRequest("Content type is required".to_string()))?;

    if image_data.is_empty() {
        return Err(AppError::BadRequest("Image is empty".to_string()));
    }

    if image_data.len() > MAX_UPLOAD_SIZE {
        return Err(AppError::BadRequest(format!(
            "Image exceeds the maximum size of {} bytes",
            MAX_UPLOAD_SIZE
        )));
    }

    if !is_image_type_allowed(&content_type) {
        return Err(AppError::BadRequest(format!(
            "Unsupported image type '{}'. Allowed: {}",
            content_type,
            ALLOWED_IMAGE_TYPES.join(", ")
        )));
    }

    let outcome = service.classify_photo(&image_data, &content_type).await?;

    let dto = ClassificationResultDto {
        category: outcome.category,
        file_path: outcome.photo_url,
    };

    Ok(Json(ApiResponse::success(Some(dto), None, None)))
}
