use async_trait::async_trait;
use carton_core::validation::{sanitize_filename, split_filename};
use carton_core::{FileKind, FileRecord};
use carton_storage::{Storage, StorageError};
use chrono::Utc;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{FileStore, StoreError, StoreResult};
use crate::upload::LocalFile;

/// `FileStore` implementation composing a blob storage backend with an
/// in-process record catalog.
///
/// Records live behind an `RwLock`; each mutation takes the write lock once,
/// so concurrent edits resolve last-write-wins. Durable record persistence
/// sits behind the `FileStore` trait, not in this type.
pub struct CatalogStore {
    storage: Arc<dyn Storage>,
    records: RwLock<HashMap<Uuid, FileRecord>>,
}

impl CatalogStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        CatalogStore {
            storage,
            records: RwLock::new(HashMap::new()),
        }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }
}

fn upload_error(err: StorageError) -> StoreError {
    StoreError::Upload(err.to_string())
}

#[async_trait]
impl FileStore for CatalogStore {
    async fn upload(
        &self,
        file: &LocalFile,
        owner_email: &str,
        account_id: Uuid,
    ) -> StoreResult<FileRecord> {
        let safe_name = sanitize_filename(&file.name).map_err(|e| StoreError::Upload(e.to_string()))?;
        let (_, extension) = split_filename(&safe_name);

        let (storage_id, url) = self
            .storage
            .upload(
                owner_email,
                &safe_name,
                "application/octet-stream",
                file.content.to_vec(),
            )
            .await
            .map_err(upload_error)?;

        let now = Utc::now();
        let record = FileRecord {
            id: Uuid::new_v4(),
            storage_id,
            name: safe_name,
            kind: FileKind::from_extension(&extension),
            extension,
            size_bytes: file.size_bytes as i64,
            url,
            owner_email: owner_email.to_string(),
            account_id,
            admin_emails: BTreeSet::new(),
            user_emails: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        };

        self.records
            .write()
            .await
            .insert(record.id, record.clone());

        tracing::info!(
            file_id = %record.id,
            storage_id = %record.storage_id,
            owner = %owner_email,
            size_bytes = record.size_bytes,
            "File record created"
        );

        Ok(record)
    }

    async fn rename(&self, file_id: Uuid, new_name: &str) -> StoreResult<FileRecord> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&file_id)
            .ok_or(StoreError::NotFound(file_id))?;

        record.name = new_name.to_string();
        record.updated_at = Utc::now();

        tracing::info!(file_id = %file_id, name = %new_name, "File renamed");

        Ok(record.clone())
    }

    async fn update_permissions(
        &self,
        file_id: Uuid,
        user_emails: BTreeSet<String>,
        admin_emails: BTreeSet<String>,
    ) -> StoreResult<FileRecord> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&file_id)
            .ok_or(StoreError::NotFound(file_id))?;

        record.user_emails = user_emails;
        record.admin_emails = admin_emails;
        record.updated_at = Utc::now();

        tracing::info!(
            file_id = %file_id,
            admins = record.admin_emails.len(),
            users = record.user_emails.len(),
            "File permissions updated"
        );

        Ok(record.clone())
    }

    async fn delete(&self, file_id: Uuid, storage_id: &str) -> StoreResult<()> {
        self.storage
            .delete(storage_id)
            .await
            .map_err(|e| StoreError::Delete(e.to_string()))?;

        // Blob is gone; dropping the record second means a crash in between
        // leaves a dangling record rather than an orphaned blob.
        let removed = self.records.write().await.remove(&file_id);
        if removed.is_none() {
            return Err(StoreError::NotFound(file_id));
        }

        tracing::info!(file_id = %file_id, storage_id = %storage_id, "File deleted");

        Ok(())
    }

    async fn get(&self, file_id: Uuid) -> StoreResult<Option<FileRecord>> {
        Ok(self.records.read().await.get(&file_id).cloned())
    }

    async fn list_for(&self, email: &str) -> StoreResult<Vec<FileRecord>> {
        let records = self.records.read().await;
        let mut visible: Vec<FileRecord> = records
            .values()
            .filter(|r| r.can_view(email))
            .cloned()
            .collect();
        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(visible)
    }

    fn download_url(&self, storage_id: &str) -> String {
        self.storage.public_url(storage_id)
    }
}
