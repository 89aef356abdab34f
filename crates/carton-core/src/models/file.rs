use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use utoipa::ToSchema;
use uuid::Uuid;

use super::collaborators::CollaboratorSets;

/// Mime-class of a stored file, classified from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Document,
    Image,
    Video,
    Audio,
    Other,
}

impl FileKind {
    /// Classify a file by its (lowercased) extension.
    pub fn from_extension(extension: &str) -> FileKind {
        match extension.to_lowercase().as_str() {
            "pdf" | "doc" | "docx" | "txt" | "xls" | "xlsx" | "csv" | "rtf" | "ods" | "ppt"
            | "pptx" | "md" | "html" | "htm" | "odt" => FileKind::Document,
            "jpg" | "jpeg" | "png" | "gif" | "bmp" | "svg" | "webp" | "heic" => FileKind::Image,
            "mp4" | "avi" | "mov" | "mkv" | "webm" => FileKind::Video,
            "mp3" | "wav" | "ogg" | "flac" | "m4a" | "aac" => FileKind::Audio,
            _ => FileKind::Other,
        }
    }
}

/// One stored file: immutable identity and metadata, a mutable display name,
/// and the owner/admin/user permission sets.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileRecord {
    pub id: Uuid,
    /// Storage key of the underlying blob, immutable.
    pub storage_id: String,
    /// Mutable display name (rename target).
    pub name: String,
    pub extension: String,
    pub size_bytes: i64,
    pub kind: FileKind,
    /// Public URL of the blob.
    pub url: String,
    /// The single authoritative owner, immutable.
    pub owner_email: String,
    pub account_id: Uuid,
    /// Collaborators with elevated rights (rename/share/delete).
    pub admin_emails: BTreeSet<String>,
    /// Collaborators with standard read/access rights.
    pub user_emails: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FileRecord {
    /// Whether the caller may perform owner/admin-gated actions
    /// (rename, delete, share-add).
    pub fn can_modify(&self, caller: &str) -> bool {
        caller == self.owner_email || self.admin_emails.contains(caller)
    }

    /// Whether the record is visible to the caller at all.
    pub fn can_view(&self, caller: &str) -> bool {
        caller == self.owner_email
            || self.admin_emails.contains(caller)
            || self.user_emails.contains(caller)
    }

    /// View of the permission sets through the mutation choke-point.
    pub fn collaborators(&self) -> CollaboratorSets {
        CollaboratorSets::new(
            self.owner_email.clone(),
            self.admin_emails.clone(),
            self.user_emails.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(owner: &str, admins: &[&str], users: &[&str]) -> FileRecord {
        FileRecord {
            id: Uuid::new_v4(),
            storage_id: "files/owner/abc.txt".to_string(),
            name: "abc".to_string(),
            extension: "txt".to_string(),
            size_bytes: 42,
            kind: FileKind::Document,
            url: "http://localhost:4000/files/owner/abc.txt".to_string(),
            owner_email: owner.to_string(),
            account_id: crate::constants::DEFAULT_ACCOUNT_ID,
            admin_emails: admins.iter().map(|s| s.to_string()).collect(),
            user_emails: users.iter().map(|s| s.to_string()).collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(FileKind::from_extension("pdf"), FileKind::Document);
        assert_eq!(FileKind::from_extension("PNG"), FileKind::Image);
        assert_eq!(FileKind::from_extension("mov"), FileKind::Video);
        assert_eq!(FileKind::from_extension("flac"), FileKind::Audio);
        assert_eq!(FileKind::from_extension("zip"), FileKind::Other);
        assert_eq!(FileKind::from_extension(""), FileKind::Other);
    }

    #[test]
    fn test_can_modify() {
        let record = record("owner@x.com", &["admin@x.com"], &["user@x.com"]);
        assert!(record.can_modify("owner@x.com"));
        assert!(record.can_modify("admin@x.com"));
        assert!(!record.can_modify("user@x.com"));
        assert!(!record.can_modify("stranger@x.com"));
    }

    #[test]
    fn test_can_view() {
        let record = record("owner@x.com", &["admin@x.com"], &["user@x.com"]);
        assert!(record.can_view("user@x.com"));
        assert!(!record.can_view("stranger@x.com"));
    }
}
