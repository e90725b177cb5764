use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::post, Router};

use crate::features::classification::handlers;
use crate::features::classification::services::ClassificationService;
use crate::shared::constants::MAX_UPLOAD_SIZE;

/// Create routes for the classification feature
///
/// Requires the auth middleware to be applied by the caller.
pub fn routes(classification_service: Arc<ClassificationService>) -> Router {
    Router::new()
        .route(
            "/api/classify",
            // Allow body size up to MAX_UPLOAD_SIZE + buffer for multipart overhead
            post(handlers::classify_image).layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE + 1024 * 1024)),
        )
        .with_state(classification_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::shared::test_helpers::{FixedClassifier, RecordingStore};

    const BOUNDARY: &str = "test-boundary-7f9a3c";

    fn app() -> Router {
        let service = Arc::new(ClassificationService::new(
            Arc::new(FixedClassifier("Pothole")),
            Arc::new(RecordingStore::new()),
        ));
        routes(service)
    }

    fn multipart_request(payload_len: usize) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"image\"; filename=\"photo.jpg\"\r\n",
        );
        body.extend_from_slice(b"Content-Type: image/jpeg\r\n\r\n");
        body.extend_from_slice(&vec![0u8; payload_len]);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/classify")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_accepts_images_larger_than_axum_default_limit() {
        // 3 MB payload, above axum's 2 MB default body limit
        let response = app()
            .oneshot(multipart_request(3 * 1024 * 1024))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rejects_images_over_the_upload_cap() {
        let response = app()
            .oneshot(multipart_request(MAX_UPLOAD_SIZE + 1))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
