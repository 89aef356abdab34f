//! Shared key generation for storage backends.
//!
//! Key format: `files/{owner}/{uuid}.{ext}` (or `files/{owner}/{uuid}` for
//! extensionless files).

use uuid::Uuid;

/// Generate a storage key for the given owner and extension.
///
/// The owner segment is reduced to filesystem-safe characters; blob identity
/// comes from the random UUID. All backends must use this format for
/// consistency.
pub fn generate_storage_key(owner: &str, extension: &str) -> String {
    let owner_segment: String = owner
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' || c == '@' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .replace("..", "_");

    let blob_id = Uuid::new_v4();
    if extension.is_empty() {
        format!("files/{}/{}", owner_segment, blob_id)
    } else {
        format!("files/{}/{}.{}", owner_segment, blob_id, extension)
    }
}
