use crate::database::StoreError;

/// Failure kinds of an identify call.
#[derive(Debug, thiserror::Error)]
pub enum IdentifyError {
    /// Neither email nor phone number was supplied. Raised before any store access.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The stored linkage contradicts the one-primary-per-cluster invariant.
    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),
}

impl IdentifyError {
    /// Store failures leave no partial state behind, so the whole call can be repeated.
    pub fn is_retryable(&self) -> bool {
        matches!(self, IdentifyError::Store(_))
    }
}

impl From<rusqlite::Error> for IdentifyError {
    fn from(e: rusqlite::Error) -> Self {
        IdentifyError::Store(StoreError::Database(e))
    }
}
