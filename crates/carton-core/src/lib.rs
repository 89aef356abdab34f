//! Carton Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! validation helpers shared across all carton components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{Config, StorageBackend};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{CollaboratorSets, FileKind, FileRecord};
