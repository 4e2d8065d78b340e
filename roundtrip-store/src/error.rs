//! Error types for store operations.

use thiserror::Error;

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No entry exists for the requested key.
    ///
    /// This is the normal cache-miss signal, not a failure of the store.
    #[error("cache entry not found")]
    NotFound,

    /// The underlying medium failed.
    ///
    /// Never produced by [`MemoryStore`](crate::MemoryStore).
    #[error(transparent)]
    Internal(Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Returns `true` for the cache-miss signal.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}
