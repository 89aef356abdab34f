//! Application assembly: storage, store, engines, router.

pub mod routes;
pub mod server;
pub mod telemetry;

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::sync::mpsc;

use carton_core::Config;
use carton_engine::{ActionEngine, CatalogStore, UploadCoordinator, UploadEvent};
use carton_storage::create_storage;

use crate::state::AppState;

/// Build the storage backend, store, engines, and router.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router)> {
    let storage = create_storage(&config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize storage: {}", e))?;

    let store = Arc::new(CatalogStore::new(storage));
    let (coordinator, events) = UploadCoordinator::new(store.clone(), config.max_file_size_bytes);
    spawn_event_logger(events);

    let engine = ActionEngine::new(store);

    let state = Arc::new(AppState {
        config,
        coordinator,
        engine,
    });

    let router = routes::create_router(state.clone());
    Ok((state, router))
}

/// Drain coordinator notifications into the log; the browser client
/// subscribes to these for its toasts, the server records them either way.
fn spawn_event_logger(mut events: mpsc::UnboundedReceiver<UploadEvent>) {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                UploadEvent::Succeeded { task_id, file_name } => {
                    tracing::info!(task_id = %task_id, file_name = %file_name, "Upload completed");
                }
                UploadEvent::Rejected {
                    task_id,
                    file_name,
                    reason,
                } => {
                    tracing::warn!(
                        task_id = %task_id,
                        file_name = %file_name,
                        reason = ?reason,
                        "Upload rejected"
                    );
                }
                UploadEvent::Failed {
                    task_id,
                    file_name,
                    error,
                } => {
                    tracing::warn!(
                        task_id = %task_id,
                        file_name = %file_name,
                        error = %error,
                        "Upload failed"
                    );
                }
            }
        }
    });
}
