//! File action & sharing permission engine.
//!
//! Validates caller authorization, computes the new permission sets through
//! the [`CollaboratorSets`] choke-point, and issues exactly one store
//! mutation per action. Authorization is enforced here, directly in front of
//! the store call — the presentation layer only supplies identity.

use std::sync::Arc;

use carton_core::validation::{parse_email_list, validate_display_name};
use carton_core::{AppError, FileRecord};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::store::FileStore;

/// A requested file action, as the presentation layer sees it.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum FileAction {
    Rename { name: String },
    Share { emails: String, grant_admin: bool },
    Unshare { email: String },
    Delete,
    Details,
}

/// Outcome of a performed action.
#[derive(Debug, Clone)]
pub enum ActionOutcome {
    Updated(FileRecord),
    Deleted,
    Details(FileRecord),
}

/// Gates rename/share/delete/details behind owner/admin authorization and
/// mutates owner/admin/user email sets consistently.
pub struct ActionEngine {
    store: Arc<dyn FileStore>,
}

impl ActionEngine {
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        ActionEngine { store }
    }

    /// Perform one action on behalf of `caller`. Dispatches to the typed
    /// methods below; every failure leaves the record untouched.
    pub async fn perform(
        &self,
        file_id: Uuid,
        action: FileAction,
        caller: &str,
    ) -> Result<ActionOutcome, AppError> {
        match action {
            FileAction::Rename { name } => self
                .rename(file_id, caller, &name)
                .await
                .map(ActionOutcome::Updated),
            FileAction::Share {
                emails,
                grant_admin,
            } => self
                .share_add(file_id, caller, &emails, grant_admin)
                .await
                .map(ActionOutcome::Updated),
            FileAction::Unshare { email } => self
                .share_remove(file_id, caller, &email)
                .await
                .map(ActionOutcome::Updated),
            FileAction::Delete => self
                .delete(file_id, caller)
                .await
                .map(|_| ActionOutcome::Deleted),
            FileAction::Details => self
                .details(file_id, caller)
                .await
                .map(ActionOutcome::Details),
        }
    }

    async fn load(&self, file_id: Uuid) -> Result<FileRecord, AppError> {
        self.store
            .get(file_id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::NotFound(format!("File {} not found", file_id)))
    }

    fn authorize_modify(record: &FileRecord, caller: &str, action: &str) -> Result<(), AppError> {
        if !record.can_modify(caller) {
            tracing::debug!(
                file_id = %record.id,
                caller = %caller,
                action = %action,
                "Caller is not owner or admin"
            );
            return Err(AppError::Unauthorized(format!(
                "Only the owner or an admin collaborator may {} this file",
                action
            )));
        }
        Ok(())
    }

    /// Rename a file. Owner or admin only. The candidate is a display name
    /// without extension; the record's immutable extension is re-appended.
    /// Sibling-name collisions are the store's concern.
    pub async fn rename(
        &self,
        file_id: Uuid,
        caller: &str,
        candidate: &str,
    ) -> Result<FileRecord, AppError> {
        let record = self.load(file_id).await?;
        Self::authorize_modify(&record, caller, "rename")?;

        let name = validate_display_name(candidate)?;
        let full_name = if record.extension.is_empty() {
            name
        } else {
            format!("{}.{}", name, record.extension)
        };

        tracing::info!(file_id = %file_id, caller = %caller, name = %full_name, "Renaming file");

        self.store
            .rename(file_id, &full_name)
            .await
            .map_err(AppError::from)
    }

    /// Add collaborators from a raw comma-separated email list.
    ///
    /// Duplicates and already-present emails are absorbed by set union; the
    /// owner is never admitted into either set, and an email holding the
    /// other role is moved rather than duplicated. Granting admin is
    /// owner-only; standard additions need owner or admin rights. Exactly one
    /// store mutation carries both resulting sets.
    pub async fn share_add(
        &self,
        file_id: Uuid,
        caller: &str,
        raw_emails: &str,
        grant_admin: bool,
    ) -> Result<FileRecord, AppError> {
        let record = self.load(file_id).await?;
        Self::authorize_modify(&record, caller, "share")?;
        if grant_admin && caller != record.owner_email {
            return Err(AppError::Unauthorized(
                "Only the owner may grant admin rights".to_string(),
            ));
        }

        let candidates = parse_email_list(raw_emails);
        if candidates.is_empty() {
            return Err(AppError::InvalidInput(
                "No collaborator emails provided".to_string(),
            ));
        }

        let mut sets = record.collaborators();
        sets.grant(candidates, grant_admin);
        let (user_emails, admin_emails) = sets.into_sets();

        tracing::info!(
            file_id = %file_id,
            caller = %caller,
            grant_admin,
            admins = admin_emails.len(),
            users = user_emails.len(),
            "Updating file collaborators"
        );

        self.store
            .update_permissions(file_id, user_emails, admin_emails)
            .await
            .map_err(AppError::from)
    }

    /// Remove one collaborator. Owner only; its own independent mutation
    /// call. The admin set takes precedence when the email is present in
    /// both sets.
    pub async fn share_remove(
        &self,
        file_id: Uuid,
        caller: &str,
        email: &str,
    ) -> Result<FileRecord, AppError> {
        let record = self.load(file_id).await?;
        if caller != record.owner_email {
            return Err(AppError::Unauthorized(
                "Only the owner may remove collaborators".to_string(),
            ));
        }

        let mut sets = record.collaborators();
        if !sets.revoke(email) {
            return Err(AppError::NotFound(format!(
                "{} is not a collaborator on this file",
                email
            )));
        }
        let (user_emails, admin_emails) = sets.into_sets();

        tracing::info!(file_id = %file_id, caller = %caller, removed = %email, "Removing collaborator");

        self.store
            .update_permissions(file_id, user_emails, admin_emails)
            .await
            .map_err(AppError::from)
    }

    /// Delete a file: blob and record, in one store call. Owner or admin
    /// only. Irreversible.
    pub async fn delete(&self, file_id: Uuid, caller: &str) -> Result<(), AppError> {
        let record = self.load(file_id).await?;
        Self::authorize_modify(&record, caller, "delete")?;

        tracing::info!(
            file_id = %file_id,
            storage_id = %record.storage_id,
            caller = %caller,
            "Deleting file"
        );

        self.store
            .delete(file_id, &record.storage_id)
            .await
            .map_err(AppError::from)
    }

    /// Pure read of a record, permitted to any caller who can see it.
    pub async fn details(&self, file_id: Uuid, caller: &str) -> Result<FileRecord, AppError> {
        let record = self.load(file_id).await?;
        if !record.can_view(caller) {
            return Err(AppError::Unauthorized(
                "This file is not shared with you".to_string(),
            ));
        }
        Ok(record)
    }

    /// List records visible to the caller, newest first.
    pub async fn list_for(&self, caller: &str) -> Result<Vec<FileRecord>, AppError> {
        self.store.list_for(caller).await.map_err(AppError::from)
    }

    /// Download URL handoff for a record the caller can see.
    pub async fn download_url(&self, file_id: Uuid, caller: &str) -> Result<String, AppError> {
        let record = self.details(file_id, caller).await?;
        Ok(self.store.download_url(&record.storage_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::MockFileStore;
    use crate::upload::LocalFile;
    use bytes::Bytes;
    use std::collections::BTreeSet;

    const OWNER: &str = "owner@x.com";
    const ADMIN: &str = "admin@x.com";
    const USER: &str = "user@x.com";
    const STRANGER: &str = "stranger@x.com";

    async fn seeded() -> (ActionEngine, Arc<MockFileStore>, Uuid) {
        let store = Arc::new(MockFileStore::new());
        let record = store
            .upload(
                &LocalFile::new("report.pdf", Bytes::from_static(b"pdf")),
                OWNER,
                Uuid::new_v4(),
            )
            .await
            .unwrap();
        let file_id = record.id;

        store
            .update_permissions(
                file_id,
                [USER.to_string()].into_iter().collect(),
                [ADMIN.to_string()].into_iter().collect(),
            )
            .await
            .unwrap();

        (ActionEngine::new(store.clone()), store, file_id)
    }

    fn emails(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_rename_by_owner() {
        let (engine, _store, file_id) = seeded().await;
        let renamed = engine.rename(file_id, OWNER, "annual-report").await.unwrap();
        assert_eq!(renamed.name, "annual-report.pdf");
    }

    #[tokio::test]
    async fn test_rename_by_admin() {
        let (engine, _store, file_id) = seeded().await;
        assert!(engine.rename(file_id, ADMIN, "renamed").await.is_ok());
    }

    #[tokio::test]
    async fn test_rename_unauthorized_makes_no_store_call() {
        let (engine, store, file_id) = seeded().await;
        for caller in [USER, STRANGER] {
            let result = engine.rename(file_id, caller, "sneaky").await;
            assert!(matches!(result, Err(AppError::Unauthorized(_))));
        }
        assert_eq!(store.rename_calls(), 0);
        assert_eq!(store.get_record(file_id).unwrap().name, "report.pdf");
    }

    #[tokio::test]
    async fn test_rename_empty_name_rejected() {
        let (engine, store, file_id) = seeded().await;
        let result = engine.rename(file_id, OWNER, "   ").await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
        assert_eq!(store.rename_calls(), 0);
    }

    #[tokio::test]
    async fn test_share_add_is_idempotent() {
        let (engine, _store, file_id) = seeded().await;
        let updated = engine
            .share_add(file_id, OWNER, "x@y.com, x@y.com, z@w.com", false)
            .await
            .unwrap();

        assert_eq!(updated.user_emails, emails(&[USER, "x@y.com", "z@w.com"]));
        assert_eq!(updated.admin_emails, emails(&[ADMIN]));
    }

    #[tokio::test]
    async fn test_share_add_grant_admin_by_owner() {
        let (engine, _store, file_id) = seeded().await;
        let updated = engine
            .share_add(file_id, OWNER, "new-admin@x.com", true)
            .await
            .unwrap();

        assert_eq!(updated.admin_emails, emails(&[ADMIN, "new-admin@x.com"]));
        // user set unchanged
        assert_eq!(updated.user_emails, emails(&[USER]));
    }

    #[tokio::test]
    async fn test_share_add_grant_admin_by_admin_is_rejected() {
        let (engine, store, file_id) = seeded().await;
        let result = engine.share_add(file_id, ADMIN, "x@y.com", true).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
        assert_eq!(store.update_permission_calls(), 1); // only the seed call
    }

    #[tokio::test]
    async fn test_share_add_never_duplicates_across_sets() {
        let (engine, _store, file_id) = seeded().await;

        // promote the existing standard collaborator to admin
        let updated = engine.share_add(file_id, OWNER, USER, true).await.unwrap();
        assert!(updated.admin_emails.contains(USER));
        assert!(!updated.user_emails.contains(USER));

        // and demote back
        let updated = engine.share_add(file_id, OWNER, USER, false).await.unwrap();
        assert!(updated.user_emails.contains(USER));
        assert!(!updated.admin_emails.contains(USER));
    }

    #[tokio::test]
    async fn test_share_add_never_admits_owner() {
        let (engine, _store, file_id) = seeded().await;
        let updated = engine
            .share_add(file_id, OWNER, &format!("{}, x@y.com", OWNER), false)
            .await
            .unwrap();
        assert!(!updated.user_emails.contains(OWNER));
        assert!(!updated.admin_emails.contains(OWNER));
        assert!(updated.user_emails.contains("x@y.com"));
    }

    #[tokio::test]
    async fn test_share_add_empty_input_rejected() {
        let (engine, store, file_id) = seeded().await;
        let result = engine.share_add(file_id, OWNER, " , ,", false).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
        assert_eq!(store.update_permission_calls(), 1); // only the seed call
    }

    #[tokio::test]
    async fn test_share_remove_owner_only() {
        let (engine, store, file_id) = seeded().await;

        let result = engine.share_remove(file_id, ADMIN, USER).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));

        let updated = engine.share_remove(file_id, OWNER, USER).await.unwrap();
        assert!(updated.user_emails.is_empty());
        assert_eq!(updated.admin_emails, emails(&[ADMIN]));
        assert_eq!(store.update_permission_calls(), 2); // seed + removal
    }

    #[tokio::test]
    async fn test_share_remove_unknown_email() {
        let (engine, _store, file_id) = seeded().await;
        let result = engine.share_remove(file_id, OWNER, "ghost@x.com").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_unauthorized_makes_no_store_call() {
        let (engine, store, file_id) = seeded().await;
        let result = engine.delete(file_id, USER).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
        assert_eq!(store.delete_calls(), 0);
        assert!(store.get_record(file_id).is_some());
    }

    #[tokio::test]
    async fn test_delete_by_admin() {
        let (engine, store, file_id) = seeded().await;
        engine.delete(file_id, ADMIN).await.unwrap();
        assert_eq!(store.delete_calls(), 1);
        assert!(store.get_record(file_id).is_none());
    }

    #[tokio::test]
    async fn test_details_visible_to_any_collaborator() {
        let (engine, _store, file_id) = seeded().await;
        for caller in [OWNER, ADMIN, USER] {
            assert!(engine.details(file_id, caller).await.is_ok());
        }
        let result = engine.details(file_id, STRANGER).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_failed_update_leaves_record_untouched() {
        let (engine, store, file_id) = seeded().await;
        store.fail_updates();

        let result = engine.share_add(file_id, OWNER, "x@y.com", false).await;
        assert!(matches!(result, Err(AppError::Update(_))));

        let record = store.get_record(file_id).unwrap();
        assert!(!record.user_emails.contains("x@y.com"));
    }

    #[tokio::test]
    async fn test_perform_dispatches_and_reports_missing_file() {
        let (engine, _store, file_id) = seeded().await;

        let outcome = engine
            .perform(
                file_id,
                FileAction::Rename {
                    name: "via-perform".to_string(),
                },
                OWNER,
            )
            .await
            .unwrap();
        assert!(matches!(outcome, ActionOutcome::Updated(_)));

        let missing = engine
            .perform(Uuid::new_v4(), FileAction::Delete, OWNER)
            .await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }
}
