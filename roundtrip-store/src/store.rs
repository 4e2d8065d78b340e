use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::StoreError;

/// Result of a store operation.
pub type StoreResult<T> = Result<T, StoreError>;

/// Key/value store backing the response cache.
///
/// # Contract
///
/// - [`get`](Self::get) returns the stored value for `key`, or
///   [`StoreError::NotFound`] when there is none. It has no side effects.
/// - [`set`](Self::set) inserts or overwrites the value for `key`. Setting the
///   same value twice leaves the store unchanged. It fails only when the
///   underlying medium does.
/// - A reader never observes a partially written value.
///
/// Implementations are shared between concurrent round-trips.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Reads the value stored under `key`.
    async fn get(&self, key: &str) -> StoreResult<Bytes>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: Bytes) -> StoreResult<()>;

    /// Returns the name of this store for logs.
    fn label(&self) -> &str {
        "store"
    }
}

#[async_trait]
impl<T> CacheStore for &T
where
    T: CacheStore + ?Sized,
{
    async fn get(&self, key: &str) -> StoreResult<Bytes> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Bytes) -> StoreResult<()> {
        (**self).set(key, value).await
    }

    fn label(&self) -> &str {
        (**self).label()
    }
}

#[async_trait]
impl<T> CacheStore for Box<T>
where
    T: CacheStore + ?Sized,
{
    async fn get(&self, key: &str) -> StoreResult<Bytes> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Bytes) -> StoreResult<()> {
        (**self).set(key, value).await
    }

    fn label(&self) -> &str {
        (**self).label()
    }
}

#[async_trait]
impl<T> CacheStore for Arc<T>
where
    T: CacheStore + ?Sized,
{
    async fn get(&self, key: &str) -> StoreResult<Bytes> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Bytes) -> StoreResult<()> {
        (**self).set(key, value).await
    }

    fn label(&self) -> &str {
        (**self).label()
    }
}
