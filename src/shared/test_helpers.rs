//! Test doubles shared across feature tests.

#[cfg(test)]
use std::sync::Mutex;

#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use uuid::Uuid;

#[cfg(test)]
use crate::core::error::{AppError, Result};
#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;
#[cfg(test)]
use crate::features::classification::clients::ImageClassifier;
#[cfg(test)]
use crate::features::users::models::Role;
#[cfg(test)]
use crate::modules::storage::MediaStorage;

#[cfg(test)]
pub fn admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: Uuid::new_v4(),
        role: Role::Admin,
    }
}

#[cfg(test)]
pub fn citizen_user() -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: Uuid::new_v4(),
        role: Role::Citizen,
    }
}

#[cfg(test)]
pub fn worker_user() -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: Uuid::new_v4(),
        role: Role::Worker,
    }
}

/// In-memory object store that records every upload and delete, so tests can
/// assert on cleanup behavior without a running MinIO.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingStore {
    pub uploads: Mutex<Vec<String>>,
    pub deletes: Mutex<Vec<String>>,
}

#[cfg(test)]
impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uploaded_keys(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn deleted_keys(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl MediaStorage for RecordingStore {
    fn media_key(&self, content_type: &str) -> String {
        let ext = match content_type {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/webp" => "webp",
            _ => "bin",
        };
        format!("uploads/{}.{}", Uuid::new_v4(), ext)
    }

    fn file_url(&self, key: &str) -> String {
        format!("http://media.test/civicfix-media/{}", key)
    }

    fn key_from_url(&self, url: &str) -> Option<String> {
        url.strip_prefix("http://media.test/civicfix-media/")
            .filter(|key| key.starts_with("uploads/"))
            .map(|key| key.to_string())
    }

    async fn upload(&self, key: &str, _data: &[u8], _content_type: &str) -> Result<()> {
        self.uploads.lock().unwrap().push(key.to_string());
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let deleted = self.deletes.lock().unwrap().contains(&key.to_string());
        let uploaded = self.uploads.lock().unwrap().contains(&key.to_string());
        Ok(uploaded && !deleted)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.deletes.lock().unwrap().push(key.to_string());
        Ok(())
    }
}

/// Classifier that always answers with the same text
#[cfg(test)]
pub struct FixedClassifier(pub &'static str);

#[cfg(test)]
#[async_trait]
impl ImageClassifier for FixedClassifier {
    async fn describe_image(&self, _image: &[u8], _media_type: &str) -> Result<String> {
        Ok(self.0.to_string())
    }
}

/// Classifier that always fails, for exercising the cleanup path
#[cfg(test)]
pub struct FailingClassifier;

#[cfg(test)]
#[async_trait]
impl ImageClassifier for FailingClassifier {
    async fn describe_image(&self, _image: &[u8], _media_type: &str) -> Result<String> {
        Err(AppError::ClassificationUnavailable(
            "classifier offline".to_string(),
        ))
    }
}
