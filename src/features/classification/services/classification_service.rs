use std::sync::Arc;

use crate::core::error::Result;
use crate::features::classification::clients::ImageClassifier;
use crate::features::reports::models::Category;
use crate::modules::storage::MediaStorage;

/// What a successful classify call hands back to the handler
#[derive(Debug)]
pub struct ClassificationOutcome {
    pub category: Category,
    pub photo_url: String,
}

/// Orchestrates photo upload and category suggestion.
///
/// Upload happens first so the returned URL always refers to a stored
/// object; if the classifier then fails, the object is deleted again so no
/// orphaned upload survives a failed classify call.
pub struct ClassificationService {
    classifier: Arc<dyn ImageClassifier>,
    media_store: Arc<dyn MediaStorage>,
}

impl ClassificationService {
    pub fn new(classifier: Arc<dyn ImageClassifier>, media_store: Arc<dyn MediaStorage>) -> Self {
        Self {
            classifier,
            media_store,
        }
    }

    pub async fn classify_photo(
        &self,
        image: &[u8],
        content_type: &str,
    ) -> Result<ClassificationOutcome> {
        let key = self.media_store.media_key(content_type);
        self.media_store.upload(&key, image, content_type).await?;

        let description = match self.classifier.describe_image(image, content_type).await {
            Ok(text) => text,
            Err(e) => {
                if let Err(cleanup) = self.media_store.delete(&key).await {
                    tracing::warn!(key = %key, "Failed to clean up upload: {}", cleanup);
                }
                return Err(e);
            }
        };

        let category = Category::from_classifier_text(&description);

        tracing::info!(
            key = %key,
            category = %category,
            "Classified uploaded photo"
        );

        Ok(ClassificationOutcome {
            category,
            photo_url: self.media_store.file_url(&key),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;
    use crate::shared::test_helpers::{FailingClassifier, FixedClassifier, RecordingStore};

    #[tokio::test]
    async fn test_classifier_failure_removes_upload() {
        let store = Arc::new(RecordingStore::new());
        let service = ClassificationService::new(
            Arc::new(FailingClassifier),
            Arc::clone(&store) as Arc<dyn MediaStorage>,
        );

        let result = service.classify_photo(b"not really a jpeg", "image/jpeg").await;

        assert!(matches!(
            result,
            Err(AppError::ClassificationUnavailable(_))
        ));
        let uploads = store.uploaded_keys();
        assert_eq!(uploads.len(), 1);
        assert_eq!(store.deleted_keys(), uploads);
    }

    #[tokio::test]
    async fn test_successful_classification_keeps_upload() {
        let store = Arc::new(RecordingStore::new());
        let service = ClassificationService::new(
            Arc::new(FixedClassifier("This shows a pothole in the road")),
            Arc::clone(&store) as Arc<dyn MediaStorage>,
        );

        let outcome = service
            .classify_photo(b"not really a jpeg", "image/jpeg")
            .await
            .unwrap();

        assert_eq!(outcome.category, Category::Pothole);
        let uploads = store.uploaded_keys();
        assert_eq!(uploads.len(), 1);
        assert_eq!(outcome.photo_url, store.file_url(&uploads[0]));
        assert!(store.deleted_keys().is_empty());
    }
}
