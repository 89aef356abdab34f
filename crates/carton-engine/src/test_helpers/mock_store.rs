use async_trait::async_trait;
use carton_core::{FileKind, FileRecord};
use chrono::Utc;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

use crate::store::{FileStore, StoreError, StoreResult};
use crate::upload::LocalFile;

/// In-memory `FileStore` with per-operation call counters, failure
/// injection, and a pause gate for observing in-flight uploads.
#[derive(Default)]
pub struct MockFileStore {
    records: Mutex<HashMap<Uuid, FileRecord>>,
    upload_calls: AtomicUsize,
    rename_calls: AtomicUsize,
    update_permission_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    fail_uploads_for: Mutex<HashSet<String>>,
    fail_updates: AtomicBool,
    fail_deletes: AtomicBool,
    paused: AtomicBool,
    inflight: AtomicUsize,
}

impl MockFileStore {
    pub fn new() -> Self {
        MockFileStore::default()
    }

    /// Seed a record directly into the catalog.
    pub fn insert_record(&self, record: FileRecord) {
        self.records.lock().unwrap().insert(record.id, record);
    }

    pub fn get_record(&self, file_id: Uuid) -> Option<FileRecord> {
        self.records.lock().unwrap().get(&file_id).cloned()
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn rename_calls(&self) -> usize {
        self.rename_calls.load(Ordering::SeqCst)
    }

    pub fn update_permission_calls(&self) -> usize {
        self.update_permission_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Total mutation calls of any kind.
    pub fn mutation_calls(&self) -> usize {
        self.rename_calls() + self.update_permission_calls() + self.delete_calls()
    }

    /// Make uploads of the given file name fail with an injected error.
    pub fn fail_upload_for(&self, file_name: &str) {
        self.fail_uploads_for
            .lock()
            .unwrap()
            .insert(file_name.to_string());
    }

    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    /// Hold every upload call open until `resume_uploads`.
    pub fn pause_uploads(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume_uploads(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    /// Wait until at least `n` upload calls are blocked on the pause gate.
    pub async fn wait_for_inflight(&self, n: usize) {
        while self.inflight.load(Ordering::SeqCst) < n {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    fn build_record(file: &LocalFile, owner_email: &str, account_id: Uuid) -> FileRecord {
        let (_, extension) = carton_core::validation::split_filename(&file.name);
        let now = Utc::now();
        let storage_id = format!("files/{}/{}", owner_email, Uuid::new_v4());
        FileRecord {
            id: Uuid::new_v4(),
            url: format!("mock://{}", storage_id),
            storage_id,
            name: file.name.clone(),
            kind: FileKind::from_extension(&extension),
            extension,
            size_bytes: file.size_bytes as i64,
            owner_email: owner_email.to_string(),
            account_id,
            admin_emails: BTreeSet::new(),
            user_emails: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[async_trait]
impl FileStore for MockFileStore {
    async fn upload(
        &self,
        file: &LocalFile,
        owner_email: &str,
        account_id: Uuid,
    ) -> StoreResult<FileRecord> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        self.inflight.fetch_add(1, Ordering::SeqCst);

        while self.paused.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        self.inflight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_uploads_for.lock().unwrap().contains(&file.name) {
            return Err(StoreError::Upload(format!(
                "injected failure for {}",
                file.name
            )));
        }

        let record = Self::build_record(file, owner_email, account_id);
        self.records
            .lock()
            .unwrap()
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn rename(&self, file_id: Uuid, new_name: &str) -> StoreResult<FileRecord> {
        self.rename_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(StoreError::Update("injected update failure".to_string()));
        }
        let mut records = self.records.lock().unwrap();
        let record = records
            .get_mut(&file_id)
            .ok_or(StoreError::NotFound(file_id))?;
        record.name = new_name.to_string();
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn update_permissions(
        &self,
        file_id: Uuid,
        user_emails: BTreeSet<String>,
        admin_emails: BTreeSet<String>,
    ) -> StoreResult<FileRecord> {
        self.update_permission_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(StoreError::Update("injected update failure".to_string()));
        }
        let mut records = self.records.lock().unwrap();
        let record = records
            .get_mut(&file_id)
            .ok_or(StoreError::NotFound(file_id))?;
        record.user_emails = user_emails;
        record.admin_emails = admin_emails;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete(&self, file_id: Uuid, _storage_id: &str) -> StoreResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StoreError::Delete("injected delete failure".to_string()));
        }
        self.records
            .lock()
            .unwrap()
            .remove(&file_id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(file_id))
    }

    async fn get(&self, file_id: Uuid) -> StoreResult<Option<FileRecord>> {
        Ok(self.records.lock().unwrap().get(&file_id).cloned())
    }

    async fn list_for(&self, email: &str) -> StoreResult<Vec<FileRecord>> {
        let records = self.records.lock().unwrap();
        let mut visible: Vec<FileRecord> = records
            .values()
            .filter(|r| r.can_view(email))
            .cloned()
            .collect();
        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(visible)
    }

    fn download_url(&self, storage_id: &str) -> String {
        format!("mock://{}", storage_id)
    }
}
