use std::collections::BTreeSet;

/// The single mutation choke-point for a file's permission sets.
///
/// Invariants held by construction and by every mutation:
/// - the owner never appears in either set;
/// - the admin and user sets are disjoint.
///
/// Callers build one from a `FileRecord`, apply grants/revocations, and send
/// the resulting sets to the store in a single mutation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaboratorSets {
    owner_email: String,
    admin_emails: BTreeSet<String>,
    user_emails: BTreeSet<String>,
}

impl CollaboratorSets {
    /// Build from existing sets, normalizing any prior inconsistent state:
    /// the owner is stripped from both sets, and an email present in both
    /// sets is kept in the admin set only.
    pub fn new(
        owner_email: String,
        admin_emails: BTreeSet<String>,
        user_emails: BTreeSet<String>,
    ) -> Self {
        let mut sets = CollaboratorSets {
            owner_email,
            admin_emails,
            user_emails,
        };
        sets.admin_emails.remove(&sets.owner_email);
        sets.user_emails.remove(&sets.owner_email);
        let overlap: Vec<String> = sets
            .user_emails
            .intersection(&sets.admin_emails)
            .cloned()
            .collect();
        for email in overlap {
            sets.user_emails.remove(&email);
        }
        sets
    }

    /// Add collaborators, idempotently. With `grant_admin` they land in the
    /// admin set, otherwise in the user set; an email already holding the
    /// other role is moved, never duplicated. The owner is skipped entirely.
    pub fn grant<I>(&mut self, emails: I, grant_admin: bool)
    where
        I: IntoIterator<Item = String>,
    {
        for email in emails {
            if email == self.owner_email {
                continue;
            }
            if grant_admin {
                self.user_emails.remove(&email);
                self.admin_emails.insert(email);
            } else {
                self.admin_emails.remove(&email);
                self.user_emails.insert(email);
            }
        }
    }

    /// Remove one collaborator. The admin set takes precedence when the
    /// email is (inconsistently) present in both. Returns whether anything
    /// was removed.
    pub fn revoke(&mut self, email: &str) -> bool {
        if self.admin_emails.remove(email) {
            return true;
        }
        self.user_emails.remove(email)
    }

    pub fn admin_emails(&self) -> &BTreeSet<String> {
        &self.admin_emails
    }

    pub fn user_emails(&self) -> &BTreeSet<String> {
        &self.user_emails
    }

    /// Consume into `(user_emails, admin_emails)` for the store call.
    pub fn into_sets(self) -> (BTreeSet<String>, BTreeSet<String>) {
        (self.user_emails, self.admin_emails)
    }
}
