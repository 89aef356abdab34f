use serde::Serialize;
use std::sync::{Arc, Mutex};
use utoipa::ToSchema;
use uuid::Uuid;

use super::types::{LocalFile, TaskStatus};

/// One entry of the visible pending list.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PendingTask {
    pub id: Uuid,
    pub file_name: String,
    pub size_bytes: u64,
    pub status: TaskStatus,
}

/// The live, arrival-ordered set of not-yet-terminal upload tasks — the only
/// cross-file shared state in the upload subsystem.
///
/// Mutated only by the coordinator (on task state transitions) and by
/// explicit dismissal. Its size is the sole upload-progress signal exposed to
/// callers; tasks leave it the moment they reach a terminal state.
#[derive(Clone, Default)]
pub struct PendingBatch {
    inner: Arc<Mutex<Vec<PendingTask>>>,
}

impl PendingBatch {
    pub fn new() -> Self {
        PendingBatch::default()
    }

    /// Append a new `Queued` task, preserving arrival order.
    pub(crate) fn enqueue(&self, file: &LocalFile) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.lock().unwrap().push(PendingTask {
            id,
            file_name: file.name.clone(),
            size_bytes: file.size_bytes,
            status: TaskStatus::Queued,
        });
        id
    }

    /// Mark a task as in flight. No-op if the task was dismissed meanwhile.
    pub(crate) fn mark_uploading(&self, task_id: Uuid) {
        if let Some(task) = self
            .inner
            .lock()
            .unwrap()
            .iter_mut()
            .find(|t| t.id == task_id)
        {
            task.status = TaskStatus::Uploading;
        }
    }

    /// Drop a task from the visible batch. Returns whether it was still
    /// present. Removal is visibility-only: an in-flight store call is not
    /// aborted, and its later result is discarded with respect to this batch.
    pub fn remove(&self, task_id: Uuid) -> bool {
        let mut tasks = self.inner.lock().unwrap();
        let before = tasks.len();
        tasks.retain(|t| t.id != task_id);
        tasks.len() != before
    }

    /// Arrival-ordered view of the outstanding tasks.
    pub fn snapshot(&self) -> Vec<PendingTask> {
        self.inner.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }
}
