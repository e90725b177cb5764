use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::reports::models::Category;

/// Multipart form for the classify endpoint
#[derive(Debug, Deserialize, ToSchema)]
pub struct ClassifyImageDto {
    /// The photo to classify (jpeg, png or webp)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub image: String,
}

/// Result of classifying an uploaded photo
#[derive(Debug, Serialize, ToSchema)]
pub struct ClassificationResultDto {
    /// Suggested category; clients may override it on submission
    pub category: Category,
    /// URL of the stored photo, to be echoed back in the report
    pub file_path: String,
}
