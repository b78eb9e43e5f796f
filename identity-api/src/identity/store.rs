use crate::database::StoreError;
use shared_types::{Contact, LinkPrecedence};

use super::LookupKey;

/// Fields of a contact about to be inserted; id and timestamp come from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub linked_id: Option<i64>,
    pub link_precedence: LinkPrecedence,
}

impl NewContact {
    pub fn primary(key: &LookupKey) -> Self {
        Self {
            email: key.email().map(str::to_string),
            phone_number: key.phone_number().map(str::to_string),
            linked_id: None,
            link_precedence: LinkPrecedence::Primary,
        }
    }

    pub fn secondary(key: &LookupKey, primary_id: i64) -> Self {
        Self {
            email: key.email().map(str::to_string),
            phone_number: key.phone_number().map(str::to_string),
            linked_id: Some(primary_id),
            link_precedence: LinkPrecedence::Secondary,
        }
    }
}

/// Persistence primitives used by the consolidation algorithm.
///
/// Implementations run inside a single caller-owned transaction; the trait
/// itself never begins or commits one.
pub trait ContactStore {
    /// Contacts whose email equals `email` or whose phone equals `phone_number`.
    /// An absent argument contributes no clause.
    fn find_by_email_or_phone(
        &self,
        email: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<Vec<Contact>, StoreError>;

    /// Contacts that are one of `primary_ids` or link to one, ordered by `(created_at, id)`.
    fn find_clusters(&self, primary_ids: &[i64]) -> Result<Vec<Contact>, StoreError>;

    fn create_contact(&self, contact: NewContact) -> Result<Contact, StoreError>;

    /// Rewrites `primary_id` and every contact linked to it into secondaries of
    /// `new_primary_id` in one statement. Returns the number of rows changed.
    fn demote_cluster(&self, primary_id: i64, new_primary_id: i64) -> Result<usize, StoreError>;
}
