//! Process-lifetime in-memory store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;
use smol_str::SmolStr;

use crate::{CacheStore, StoreError, StoreResult};

/// In-memory store: a string-keyed map behind a single mutex.
///
/// The lock is held only for the map access inside each [`get`] or [`set`],
/// never across a round-trip, so two concurrent cache misses may both write
/// the same key: last writer wins.
///
/// Cloning is cheap and every clone shares the same entries.
///
/// # Caveats
///
/// - Entries live as long as the store. There is no eviction or expiry.
/// - Nothing is persisted or shared across processes.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use roundtrip_store::{CacheStore, MemoryStore, StoreError};
///
/// # tokio_test_block_on(async {
/// let store = MemoryStore::new();
/// assert!(matches!(store.get("resp").await, Err(StoreError::NotFound)));
///
/// store.set("resp", Bytes::from_static(b"HTTP/1.1 200 OK\r\n\r\n")).await?;
/// assert_eq!(store.get("resp").await?, "HTTP/1.1 200 OK\r\n\r\n");
/// # Ok::<_, StoreError>(())
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     futures::executor::block_on(f)
/// # }
/// ```
///
/// [`get`]: CacheStore::get
/// [`set`]: CacheStore::set
#[derive(Clone, Debug)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<SmolStr, Bytes>>>,
    label: SmolStr,
}

impl MemoryStore {
    /// Creates an empty store labelled `"memory"`.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            label: SmolStr::new_static("memory"),
        }
    }

    /// Sets the label reported in logs.
    pub fn with_label(mut self, label: impl Into<SmolStr>) -> Self {
        self.label = label.into();
        self
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // Map operations cannot leave the map half-updated, so a poisoned lock
    // still guards consistent data.
    fn lock(&self) -> MutexGuard<'_, HashMap<SmolStr, Bytes>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Bytes> {
        self.lock().get(key).cloned().ok_or(StoreError::NotFound)
    }

    async fn set(&self, key: &str, value: Bytes) -> StoreResult<()> {
        tracing::trace!(store = %self.label, key, size = value.len(), "store write");
        self.lock().insert(SmolStr::new(key), value);
        Ok(())
    }

    fn label(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_is_not_found() {
        let store = MemoryStore::new();
        let err = store.get("resp").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn set_overwrites() {
        let store = MemoryStore::new();
        store.set("resp", Bytes::from_static(b"first")).await.unwrap();
        store.set("resp", Bytes::from_static(b"second")).await.unwrap();

        assert_eq!(store.get("resp").await.unwrap(), "second");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn empty_value_is_stored_as_is() {
        let store = MemoryStore::new();
        store.set("resp", Bytes::new()).await.unwrap();
        assert_eq!(store.get("resp").await.unwrap(), Bytes::new());
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let store = MemoryStore::new().with_label("shared");
        let clone = store.clone();
        clone.set("k", Bytes::from_static(b"v")).await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), "v");
        assert_eq!(store.label(), "shared");
    }
}
