use crate::keys::generate_storage_key;
use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use carton_core::StorageBackend;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-process storage backend. Blobs live for the lifetime of the process;
/// used by tests and by deployments that only need ephemeral storage.
#[derive(Clone)]
pub struct MemoryStorage {
    base_url: String,
    blobs: Arc<Mutex<HashMap<String, Bytes>>>,
}

impl MemoryStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        MemoryStorage {
            base_url: base_url.into(),
            blobs: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of stored blobs. Test helper.
    pub fn len(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.lock().unwrap().is_empty()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        MemoryStorage::new("memory://carton")
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn upload(
        &self,
        owner: &str,
        filename: &str,
        _content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<(String, String)> {
        let extension = filename.rsplit_once('.').map(|(_, e)| e).unwrap_or("");
        let key = generate_storage_key(owner, extension);
        let size = data.len();

        self.blobs
            .lock()
            .unwrap()
            .insert(key.clone(), Bytes::from(data));

        tracing::debug!(key = %key, size_bytes = size, "Memory storage upload successful");

        let url = self.public_url(&key);
        Ok((key, url))
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        self.blobs
            .lock()
            .unwrap()
            .get(storage_key)
            .map(|b| b.to_vec())
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.blobs.lock().unwrap().remove(storage_key);
        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        Ok(self.blobs.lock().unwrap().contains_key(storage_key))
    }

    async fn content_length(&self, storage_key: &str) -> StorageResult<u64> {
        self.blobs
            .lock()
            .unwrap()
            .get(storage_key)
            .map(|b| b.len() as u64)
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
