//! Record store abstraction: known medicines looked up by name, barcode, or
//! composition keyword.

mod memory;

pub use memory::MemoryStore;

use crate::models::StoredRecord;

pub const DEFAULT_SUGGESTION_LIMIT: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store cannot be reached right now. Callers show a retryable
    /// notice and continue as if nothing matched.
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    #[error("record store data is corrupt: {0}")]
    Corrupt(String),

    #[error("failed to read record store: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse record store: {0}")]
    Parse(#[from] serde_json::Error),
}

impl StoreError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

/// Read-only access to stored medicine records.
/// Implemented by `MemoryStore`; mock implementations used in tests.
#[allow(async_fn_in_trait)]
pub trait RecordStore {
    /// Records matching `term`, in store order. An empty list means no match.
    async fn lookup_by_term(&self, term: &str) -> Result<Vec<StoredRecord>, StoreError>;

    /// Record names for incremental search-box suggestions.
    async fn list_suggestions(&self, prefix: &str, limit: usize)
    -> Result<Vec<String>, StoreError>;
}
