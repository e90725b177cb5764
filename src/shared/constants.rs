/// Maximum size of an uploaded report photo in bytes
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Image MIME types accepted by the classify endpoint
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Bounded attempts for conflicting status writes before surfacing StoreConflict
pub const MAX_WRITE_RETRIES: u32 = 3;

pub fn is_image_type_allowed(content_type: &str) -> bool {
    ALLOWED_IMAGE_TYPES.contains(&content_type)
}
