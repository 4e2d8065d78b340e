use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use roundtrip_store::{CacheStore, MemoryStore, StoreError, StoreResult};

#[derive(Debug, Default)]
struct StoreCounters {
    get_count: AtomicUsize,
    hit_count: AtomicUsize,
    miss_count: AtomicUsize,
    set_count: AtomicUsize,
}

/// [`MemoryStore`] with counters and switchable failures.
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    store: MemoryStore,
    counters: Arc<StoreCounters>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl MockStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The wrapped store.
    pub fn inner(&self) -> &MemoryStore {
        &self.store
    }

    /// Makes every `get` fail with an internal error.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every `set` fail with an internal error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Calls to `get`.
    pub fn get_count(&self) -> usize {
        self.counters.get_count.load(Ordering::SeqCst)
    }

    /// `get` calls that found a value.
    pub fn hit_count(&self) -> usize {
        self.counters.hit_count.load(Ordering::SeqCst)
    }

    /// `get` calls that returned not-found.
    pub fn miss_count(&self) -> usize {
        self.counters.miss_count.load(Ordering::SeqCst)
    }

    /// Calls to `set`.
    pub fn set_count(&self) -> usize {
        self.counters.set_count.load(Ordering::SeqCst)
    }
}

fn broken() -> StoreError {
    StoreError::Internal(Box::new(io::Error::other("store unavailable")))
}

#[async_trait]
impl CacheStore for MockStore {
    async fn get(&self, key: &str) -> StoreResult<Bytes> {
        self.counters.get_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(broken());
        }
        let result = self.store.get(key).await;
        match &result {
            Ok(_) => self.counters.hit_count.fetch_add(1, Ordering::SeqCst),
            Err(_) => self.counters.miss_count.fetch_add(1, Ordering::SeqCst),
        };
        result
    }

    async fn set(&self, key: &str, value: Bytes) -> StoreResult<()> {
        self.counters.set_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(broken());
        }
        self.store.set(key, value).await
    }

    fn label(&self) -> &str {
        "mock"
    }
}
