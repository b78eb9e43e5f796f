//! Identity consolidation: resolves an email and/or phone number to one
//! canonical contact cluster, merging clusters that turn out to be the same
//! customer.

mod consolidate;
mod error;
mod lookup;
mod store;

pub use consolidate::{consolidate, project};
pub use error::IdentifyError;
pub use lookup::LookupKey;
pub use store::{ContactStore, NewContact};

use crate::database::contacts::SqliteContactStore;
use crate::database::AsyncDbConnection;
use rusqlite::TransactionBehavior;
use shared_types::{IdentifyRequest, IdentifyResponse};
use tracing::Instrument;
use uuid::Uuid;

/// Runs identify calls against the contact store.
///
/// Holds no state of its own beyond the store handle; concurrent calls are
/// serialized by the database's write transactions.
#[derive(Clone)]
pub struct ConsolidationEngine {
    db: AsyncDbConnection,
}

impl ConsolidationEngine {
    pub fn new(db: AsyncDbConnection) -> Self {
        Self { db }
    }

    pub async fn identify(
        &self,
        request: IdentifyRequest,
    ) -> Result<IdentifyResponse, IdentifyError> {
        let key = LookupKey::try_from(request)?;
        let span = tracing::info_span!("identify", request_id = %Uuid::new_v4());

        self.identify_in_transaction(key).instrument(span).await
    }

    async fn identify_in_transaction(
        &self,
        key: LookupKey,
    ) -> Result<IdentifyResponse, IdentifyError> {
        let mut conn = self.db.lock().await?;

        // IMMEDIATE takes the write lock up front. Nothing below awaits until
        // commit, and dropping `tx` on any error rolls everything back.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let contact = consolidate(&SqliteContactStore::new(&tx), &key)?;
        tx.commit()?;

        tracing::debug!(
            primary_contact_id = contact.primary_contact_id,
            secondaries = contact.secondary_contact_ids.len(),
            "Identify committed"
        );

        Ok(IdentifyResponse { contact })
    }
}
