//! Concurrent multi-file upload pipeline.
//!
//! A submitted batch becomes one `UploadTask` per file; tasks are validated,
//! driven concurrently against the store, and reconciled into the visible
//! `PendingBatch` as each one resolves.

mod batch;
mod coordinator;
mod types;

pub use batch::{PendingBatch, PendingTask};
pub use coordinator::UploadCoordinator;
pub use types::{LocalFile, RejectReason, TaskStatus, UploadEvent, UploadOutcome};
