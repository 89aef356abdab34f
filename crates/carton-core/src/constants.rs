//! Application-wide constants.

use uuid::Uuid;

/// Upper bound on a single uploaded file's byte size (50 MiB).
/// Files exceeding it are rejected before any storage call is made.
pub const MAX_FILE_SIZE_BYTES: u64 = 50 * 1024 * 1024;

/// Default account ID used when no account is supplied with an upload batch.
/// Deterministic UUID distinct from Uuid::nil() to avoid confusion with
/// uninitialized or sentinel values. Stable across deployments.
pub const DEFAULT_ACCOUNT_ID: Uuid = Uuid::from_u128(0xa7c1e9d3_4f2b_5a6c_8d0e_1f2a3b4c5d6e);

/// Maximum length of a stored display name, in characters.
pub const MAX_FILENAME_LENGTH: usize = 255;
