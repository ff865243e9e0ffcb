//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for dossier_core::AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => {
                dossier_core::AppError::NotFound(format!("File not found: {}", key))
            }
            StorageError::InvalidKey(msg) => dossier_core::AppError::BadRequest(msg),
            other => dossier_core::AppError::Storage(other.to_string()),
        }
    }
}

/// Metadata recorded with an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    pub content_type: String,
    pub file_name: Option<String>,
}

impl ObjectMetadata {
    pub fn new(content_type: impl Into<String>) -> Self {
        ObjectMetadata {
            content_type: content_type.into(),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

/// Reference to an uploaded object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Storage key, kept on the record as its storage path
    pub key: String,
    /// Stable URL of the object. Private backends may require signing it first.
    pub url: String,
}

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) implement this trait so the
/// record services can work with either without coupling to backend details.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload `data` under `key`
    async fn upload(
        &self,
        key: &str,
        data: Vec<u8>,
        metadata: &ObjectMetadata,
    ) -> StorageResult<StoredObject>;

    /// Download a file by its storage key
    async fn download(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Delete a file by its storage key. Deleting a missing key succeeds.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Resolve a key to a download URL valid for `expires_in`
    async fn get_download_url(&self, key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Check whether a key exists
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    fn backend_type(&self) -> StorageBackend;
}
