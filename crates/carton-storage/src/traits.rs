//! Storage abstraction trait
//!
//! This module defines the Storage trait that all blob storage backends must
//! implement.

use async_trait::async_trait;
use carton_core::StorageBackend;
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

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// All blob backends (local filesystem, in-memory) must implement this trait,
/// so the file store can work with any backend without coupling to
/// implementation details.
///
/// **Key format:** Keys are owner-scoped: `files/{owner}/{uuid}.{ext}`. See
/// the crate root documentation.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload a blob and return (storage_key, storage_url)
    ///
    /// The storage_key is an internal identifier used to reference the blob;
    /// the storage_url is the publicly accessible URL to it.
    async fn upload(
        &self,
        owner: &str,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<(String, String)>;

    /// Download a blob by its storage key
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Delete a blob by its storage key. Deleting a missing key is not an
    /// error.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Check if a blob exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Get the size in bytes of a blob, if it exists.
    async fn content_length(&self, storage_key: &str) -> StorageResult<u64>;

    /// Build the public URL for a storage key. Pure and non-failing; used to
    /// hand off downloads to an external mechanism.
    fn public_url(&self, storage_key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
