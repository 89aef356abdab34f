use crate::{LocalStorage, MemoryStorage, Storage, StorageBackend, StorageError, StorageResult};
use carton_core::Config;
use std::sync::Arc;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend {
        StorageBackend::Local => {
            let base_path = config.local_storage_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            let base_url = config.local_storage_base_url.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
            })?;

            let storage = LocalStorage::new(base_path, base_url).await?;
            Ok(Arc::new(storage))
        }

        StorageBackend::Memory => {
            let base_url = config
                .local_storage_base_url
                .clone()
                .unwrap_or_else(|| "memory://carton".to_string());
            Ok(Arc::new(MemoryStorage::new(base_url)))
        }
    }
}
