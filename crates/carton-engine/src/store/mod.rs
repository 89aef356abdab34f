//! The storage/catalog collaborator consumed by both subsystems.
//!
//! `FileStore` is the seam between the engine and whatever actually persists
//! file records and blobs. The engine performs exactly one store call per
//! action; cross-client consistency is the store's concern (last-write-wins).

mod catalog;

pub use catalog::CatalogStore;

use async_trait::async_trait;
use carton_core::{AppError, FileRecord};
use std::collections::BTreeSet;
use thiserror::Error;
use uuid::Uuid;

use crate::upload::LocalFile;

/// Store operation errors, one variant per failing operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Update failed: {0}")]
    Update(String),

    #[error("Delete failed: {0}")]
    Delete(String),

    #[error("File not found: {0}")]
    NotFound(Uuid),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Upload(msg) => AppError::Upload(msg),
            StoreError::Update(msg) => AppError::Update(msg),
            StoreError::Delete(msg) => AppError::Delete(msg),
            StoreError::NotFound(id) => AppError::NotFound(format!("File {} not found", id)),
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// External collaborator holding file records and their blobs.
///
/// All mutations are atomic per call: a failed call leaves the record
/// untouched, and `update_permissions` replaces both permission sets in one
/// operation.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store a new file's blob and create its record.
    async fn upload(
        &self,
        file: &LocalFile,
        owner_email: &str,
        account_id: Uuid,
    ) -> StoreResult<FileRecord>;

    /// Replace the display name of a record. Refreshes `updated_at`.
    async fn rename(&self, file_id: Uuid, new_name: &str) -> StoreResult<FileRecord>;

    /// Replace both permission sets atomically. Refreshes `updated_at`.
    async fn update_permissions(
        &self,
        file_id: Uuid,
        user_emails: BTreeSet<String>,
        admin_emails: BTreeSet<String>,
    ) -> StoreResult<FileRecord>;

    /// Remove the blob and the record. Irreversible.
    async fn delete(&self, file_id: Uuid, storage_id: &str) -> StoreResult<()>;

    /// Fetch a record by ID.
    async fn get(&self, file_id: Uuid) -> StoreResult<Option<FileRecord>>;

    /// List records visible to the given email (owned or shared-with),
    /// newest first.
    async fn list_for(&self, email: &str) -> StoreResult<Vec<FileRecord>>;

    /// Build the download URL for a blob. Pure and non-failing.
    fn download_url(&self, storage_id: &str) -> String;
}
