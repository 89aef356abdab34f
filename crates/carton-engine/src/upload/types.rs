use bytes::Bytes;
use carton_core::FileRecord;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// A pending local file handed to the coordinator: name, declared size, and
/// byte content.
#[derive(Debug, Clone)]
pub struct LocalFile {
    pub name: String,
    pub size_bytes: u64,
    pub content: Bytes,
}

impl LocalFile {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        LocalFile {
            name: name.into(),
            size_bytes: content.len() as u64,
            content,
        }
    }
}

/// Why a task was rejected before any store call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    SizeExceeded,
}

/// Task lifecycle. Each task transitions exactly once to a terminal state:
/// `Queued → Uploading → Succeeded | Failed`, or `Queued → Rejected`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum TaskStatus {
    Queued,
    Uploading,
    Succeeded,
    Rejected { reason: RejectReason },
    Failed { error: String },
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Succeeded | TaskStatus::Rejected { .. } | TaskStatus::Failed { .. }
        )
    }
}

/// Terminal result of one task, handed back to the caller when the whole
/// batch has resolved.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum UploadOutcome {
    Succeeded {
        task_id: Uuid,
        record: FileRecord,
    },
    Rejected {
        task_id: Uuid,
        file_name: String,
        reason: RejectReason,
    },
    Failed {
        task_id: Uuid,
        file_name: String,
        error: String,
    },
}

impl UploadOutcome {
    pub fn task_id(&self) -> Uuid {
        match self {
            UploadOutcome::Succeeded { task_id, .. }
            | UploadOutcome::Rejected { task_id, .. }
            | UploadOutcome::Failed { task_id, .. } => *task_id,
        }
    }

    pub fn record(&self) -> Option<&FileRecord> {
        match self {
            UploadOutcome::Succeeded { record, .. } => Some(record),
            _ => None,
        }
    }
}

/// User-visible notification emitted as individual tasks resolve, standing in
/// for per-file toasts at the presentation layer.
#[derive(Debug, Clone)]
pub enum UploadEvent {
    Rejected {
        task_id: Uuid,
        file_name: String,
        reason: RejectReason,
    },
    Succeeded {
        task_id: Uuid,
        file_name: String,
    },
    Failed {
        task_id: Uuid,
        file_name: String,
        error: String,
    },
}
