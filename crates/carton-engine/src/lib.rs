//! Carton Engine Library
//!
//! The two core subsystems of the file manager:
//!
//! - the **upload coordinator**, which validates, transmits, and reconciles
//!   an arbitrary batch of files concurrently against the store;
//! - the **action engine**, which gates rename/share/delete/details behind
//!   owner/admin authorization and mutates the permission sets through a
//!   single checked choke-point.
//!
//! Both operate against the [`store::FileStore`] trait; [`store::CatalogStore`]
//! is the bundled implementation composing blob storage with a file-record
//! catalog.

pub mod actions;
pub mod store;
pub mod test_helpers;
pub mod upload;

// Re-export commonly used types
pub use actions::{ActionEngine, ActionOutcome, FileAction};
pub use store::{CatalogStore, FileStore, StoreError};
pub use upload::{
    LocalFile, PendingBatch, PendingTask, RejectReason, TaskStatus, UploadCoordinator,
    UploadEvent, UploadOutcome,
};
