//! MinIO/S3-compatible storage for report photos.
//!
//! Uses rust-s3 for lightweight S3 operations. Every object lives under a
//! single upload prefix and is addressed by an opaque UUID key, so nothing
//! about the submitter leaks through the URL.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::config::StorageConfig;
use crate::core::error::AppError;

/// Object-store operations the application depends on.
///
/// `MediaStore` is the production implementation; tests substitute an
/// in-memory recorder so flows like classify-then-cleanup can be exercised
/// without a running MinIO.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Generate a fresh opaque key for an upload, e.g. "uploads/<uuid>.jpg"
    fn media_key(&self, content_type: &str) -> String;

    /// Public URL for an object key
    fn file_url(&self, key: &str) -> String;

    /// Recover the object key from a URL this store produced.
    ///
    /// Returns None for URLs outside this endpoint, bucket, or upload prefix.
    fn key_from_url(&self, url: &str) -> Option<String>;

    /// Upload an object
    async fn upload(&self, key: &str, data: &[u8], content_type: &str) -> Result<(), AppError>;

    /// Check whether an object exists
    async fn exists(&self, key: &str) -> Result<bool, AppError>;

    /// Delete an object
    async fn delete(&self, key: &str) -> Result<(), AppError>;
}

/// Object store for uploaded report photos
pub struct MediaStore {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    public_endpoint: String,
    upload_prefix: String,
}

impl MediaStore {
    pub fn new(config: &StorageConfig) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Failed to create storage credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Internal(format!("Failed to create storage bucket: {}", e)))?;

        // Path-style URLs for MinIO (http://endpoint/bucket, not http://bucket.endpoint)
        bucket.set_path_style();

        Ok(Self {
            bucket,
            region,
            credentials,
            public_endpoint: config.public_endpoint.trim_end_matches('/').to_string(),
            upload_prefix: config.upload_prefix.clone(),
        })
    }

    /// Ensure the bucket exists, creating it if needed
    pub async fn ensure_bucket_exists(&self) -> Result<(), AppError> {
        match Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await
        {
            Ok(_) => {
                info!("Bucket '{}' created", self.bucket.name());
                Ok(())
            }
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("BucketAlreadyOwnedByYou")
                    || error_str.contains("BucketAlreadyExists")
                    || error_str.contains("already own it")
                {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                    Ok(())
                } else {
                    // The bucket may exist behind a different error; startup continues
                    warn!(
                        "Could not create bucket '{}': {}. Assuming it exists.",
                        self.bucket.name(),
                        e
                    );
                    Ok(())
                }
            }
        }
    }
}

#[async_trait]
impl MediaStorage for MediaStore {
    fn media_key(&self, content_type: &str) -> String {
        let ext = match content_type {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/webp" => "webp",
            _ => "bin",
        };
        format!("{}/{}.{}", self.upload_prefix, Uuid::new_v4(), ext)
    }

    fn file_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_endpoint, self.bucket.name(), key)
    }

    fn key_from_url(&self, url: &str) -> Option<String> {
        let base = format!("{}/{}/", self.public_endpoint, self.bucket.name());
        let key = url.strip_prefix(&base)?;
        if !key.starts_with(&format!("{}/", self.upload_prefix)) {
            return None;
        }
        Some(key.to_string())
    }

    async fn upload(&self, key: &str, data: &[u8], content_type: &str) -> Result<(), AppError> {
        self.bucket
            .put_object_with_content_type(key, data, content_type)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to upload '{}': {}", key, e)))?;

        debug!("Uploaded '{}' to bucket '{}'", key, self.bucket.name());
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, AppError> {
        match self.bucket.head_object(key).await {
            Ok(_) => Ok(true),
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("404") || error_str.contains("NoSuchKey") {
                    Ok(false)
                } else {
                    Err(AppError::Internal(format!(
                        "Failed to check object '{}': {}",
                        key, e
                    )))
                }
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.bucket
            .delete_object(key)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to delete '{}': {}", key, e)))?;

        debug!("Deleted '{}' from bucket '{}'", key, self.bucket.name());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MediaStore {
        MediaStore::new(&StorageConfig {
            endpoint: "http://localhost:9000".to_string(),
            public_endpoint: "http://media.example.com".to_string(),
            access_key: "test".to_string(),
            secret_key: "test".to_string(),
            bucket: "civicfix-media".to_string(),
            region: "us-east-1".to_string(),
            upload_prefix: "uploads".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_media_key_uses_prefix_and_extension() {
        let store = store();
        let key = store.media_key("image/png");
        assert!(key.starts_with("uploads/"));
        assert!(key.ends_with(".png"));
    }

    #[test]
    fn test_file_url_roundtrips_through_key_from_url() {
        let store = store();
        let key = store.media_key("image/jpeg");
        let url = store.file_url(&key);
        assert_eq!(store.key_from_url(&url), Some(key));
    }

    #[test]
    fn test_key_from_url_rejects_foreign_urls() {
        let store = store();
        assert_eq!(
            store.key_from_url("http://evil.example.com/civicfix-media/uploads/x.jpg"),
            None
        );
        assert_eq!(
            store.key_from_url("http://media.example.com/other-bucket/uploads/x.jpg"),
            None
        );
        assert_eq!(
            store.key_from_url("http://media.example.com/civicfix-media/secrets/x.jpg"),
            None
        );
    }
}
