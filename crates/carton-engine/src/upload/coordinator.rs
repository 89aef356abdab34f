use std::sync::Arc;

use carton_core::validation::validate_file_size;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::batch::PendingBatch;
use super::types::{LocalFile, RejectReason, UploadEvent, UploadOutcome};
use crate::store::FileStore;

/// Drives a batch of per-file upload tasks concurrently against the store
/// and reconciles the visible [`PendingBatch`] as each task resolves.
///
/// A submission never fails as a whole: oversized files are rejected before
/// any store call, store failures are isolated to their own file, and the
/// call returns only once every task in the batch is terminal.
pub struct UploadCoordinator {
    store: Arc<dyn FileStore>,
    batch: PendingBatch,
    events: mpsc::UnboundedSender<UploadEvent>,
    max_file_size: u64,
}

impl UploadCoordinator {
    /// Create a coordinator and the receiving end of its notification
    /// channel.
    pub fn new(
        store: Arc<dyn FileStore>,
        max_file_size: u64,
    ) -> (Self, mpsc::UnboundedReceiver<UploadEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let coordinator = UploadCoordinator {
            store,
            batch: PendingBatch::new(),
            events,
            max_file_size,
        };
        (coordinator, rx)
    }

    /// The live pending list; its size is the upload-progress signal.
    pub fn pending(&self) -> &PendingBatch {
        &self.batch
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Dismiss a still-pending task from the visible batch. Visibility-only:
    /// an in-flight store call is not aborted, and its result is silently
    /// discarded with respect to the batch.
    pub fn dismiss(&self, task_id: Uuid) -> bool {
        let removed = self.batch.remove(task_id);
        if removed {
            tracing::debug!(task_id = %task_id, "Upload task dismissed");
        }
        removed
    }

    /// Submit a batch of local files for upload.
    ///
    /// Every file becomes a `Queued` task in the pending batch, in arrival
    /// order. Oversized files transition to `Rejected` immediately with zero
    /// store calls; the rest transition to `Uploading` and issue one
    /// concurrent `FileStore::upload` each, with no concurrency cap at this
    /// layer. The future resolves once every task is terminal, returning the
    /// per-file outcomes in arrival order.
    pub async fn submit(
        &self,
        files: Vec<LocalFile>,
        owner_email: &str,
        account_id: Uuid,
    ) -> Vec<UploadOutcome> {
        let mut planned: Vec<Result<(Uuid, LocalFile), UploadOutcome>> =
            Vec::with_capacity(files.len());

        for file in files {
            let task_id = self.batch.enqueue(&file);

            if validate_file_size(file.size_bytes, self.max_file_size).is_err() {
                self.batch.remove(task_id);
                tracing::warn!(
                    task_id = %task_id,
                    file_name = %file.name,
                    size_bytes = file.size_bytes,
                    max_bytes = self.max_file_size,
                    "Rejected oversized upload"
                );
                let _ = self.events.send(UploadEvent::Rejected {
                    task_id,
                    file_name: file.name.clone(),
                    reason: RejectReason::SizeExceeded,
                });
                planned.push(Err(UploadOutcome::Rejected {
                    task_id,
                    file_name: file.name,
                    reason: RejectReason::SizeExceeded,
                }));
                continue;
            }

            planned.push(Ok((task_id, file)));
        }

        let uploads = planned.into_iter().map(|entry| async move {
            match entry {
                Err(rejected) => rejected,
                Ok((task_id, file)) => self.run_task(task_id, file, owner_email, account_id).await,
            }
        });

        futures::future::join_all(uploads).await
    }

    /// Drive one accepted task to its terminal state.
    async fn run_task(
        &self,
        task_id: Uuid,
        file: LocalFile,
        owner_email: &str,
        account_id: Uuid,
    ) -> UploadOutcome {
        self.batch.mark_uploading(task_id);

        tracing::debug!(
            task_id = %task_id,
            file_name = %file.name,
            size_bytes = file.size_bytes,
            "Uploading file"
        );

        let result = self.store.upload(&file, owner_email, account_id).await;

        // Terminal: leave the visible batch regardless of outcome. A task
        // dismissed mid-flight is already gone; its result is discarded with
        // respect to the batch.
        let was_visible = self.batch.remove(task_id);

        match result {
            Ok(record) => {
                tracing::info!(
                    task_id = %task_id,
                    file_id = %record.id,
                    file_name = %file.name,
                    dismissed = !was_visible,
                    "Upload succeeded"
                );
                let _ = self.events.send(UploadEvent::Succeeded {
                    task_id,
                    file_name: file.name,
                });
                UploadOutcome::Succeeded { task_id, record }
            }
            Err(err) => {
                let error = err.to_string();
                tracing::warn!(
                    task_id = %task_id,
                    file_name = %file.name,
                    error = %error,
                    "Upload failed"
                );
                let _ = self.events.send(UploadEvent::Failed {
                    task_id,
                    file_name: file.name.clone(),
                    error: error.clone(),
                });
                UploadOutcome::Failed {
                    task_id,
                    file_name: file.name,
                    error,
                }
            }
        }
    }
}
