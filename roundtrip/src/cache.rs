use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use roundtrip_core::{
    CacheStatus, FixedKey, KeyExtractor, Request, Response, Transport, TransportResult,
};
use roundtrip_http::{parse_response, serialize_response};
use roundtrip_store::{CacheStore, StoreError};
use tower::Layer;
use tracing::{debug, trace, warn};

use crate::metrics;

/// Replays stored responses instead of calling the network.
///
/// Per round-trip, with `key` computed by the [`KeyExtractor`]:
///
/// | Store lookup | Action |
/// |--------------|--------|
/// | non-empty value that parses | return the replayed response ([`CacheStatus::Hit`]); the inner transport is not called |
/// | not found | call the inner transport; on success store its wire form and return it ([`CacheStatus::Miss`]) |
/// | empty or unparsable value | call the inner transport and return its outcome without storing ([`CacheStatus::Bypass`]) |
///
/// Exactly one store write happens per successful miss, none on a hit.
/// Failures of the inner transport are returned unchanged and nothing is
/// stored. Caching is best-effort: a read error other than not-found counts as
/// a miss, and a response that cannot be serialized or a failed store write
/// is logged and dropped, never surfaced to the caller.
///
/// The store lock is only held inside each `get`/`set`, so two concurrent
/// misses on the same key both go upstream and the last write wins.
///
/// With the default [`FixedKey`] every request shares a single slot.
pub struct CacheTransport<T, S: ?Sized, K = FixedKey> {
    inner: T,
    store: Arc<S>,
    key: K,
}

impl<T, S: ?Sized> CacheTransport<T, S> {
    /// Wraps `inner`, caching into `store` under the default fixed key.
    pub fn new(inner: T, store: Arc<S>) -> Self {
        Self {
            inner,
            store,
            key: FixedKey::default(),
        }
    }
}

impl<T, S: ?Sized, K> CacheTransport<T, S, K> {
    /// Replaces the key extractor.
    pub fn with_key<NK>(self, key: NK) -> CacheTransport<T, S, NK> {
        CacheTransport {
            inner: self.inner,
            store: self.store,
            key,
        }
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The wrapped transport.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }
}

impl<T, S, K> CacheTransport<T, S, K>
where
    T: Transport,
    S: CacheStore + ?Sized,
    K: KeyExtractor,
{
    async fn bypass(&self, request: &mut Request) -> TransportResult<Response> {
        metrics::cache(CacheStatus::Bypass);
        let mut response = self.inner.round_trip(request).await?;
        response.extensions_mut().insert(CacheStatus::Bypass);
        Ok(response)
    }

    async fn store_response(&self, key: &str, response: &Response) {
        let wire = match serialize_response(response) {
            Ok(wire) => wire,
            Err(error) => {
                warn!(key, %error, "response not serializable, skipping cache write");
                return;
            }
        };
        if let Err(error) = self.store.set(key, wire).await {
            warn!(key, store = self.store.label(), %error, "cache write failed");
        }
    }
}

#[async_trait]
impl<T, S, K> Transport for CacheTransport<T, S, K>
where
    T: Transport,
    S: CacheStore + ?Sized,
    K: KeyExtractor,
{
    async fn round_trip(&self, request: &mut Request) -> TransportResult<Response> {
        let key = self.key.extract(request);
        trace!(%key, "cache roundtrip");

        match self.store.get(&key).await {
            Ok(value) if value.is_empty() => {
                debug!(%key, "empty cache entry, bypassing cache");
                return self.bypass(request).await;
            }
            Ok(value) => match parse_response(&value) {
                Ok(mut response) => {
                    debug!(%key, status = %response.status(), "read from cache");
                    metrics::cache(CacheStatus::Hit);
                    response.extensions_mut().insert(CacheStatus::Hit);
                    return Ok(response);
                }
                Err(error) => {
                    warn!(%key, %error, "unreadable cache entry, bypassing cache");
                    return self.bypass(request).await;
                }
            },
            Err(StoreError::NotFound) => {
                debug!(%key, "cache miss, read from upstream");
            }
            Err(error) => {
                warn!(%key, store = self.store.label(), %error, "cache read failed, treating as miss");
            }
        }

        metrics::cache(CacheStatus::Miss);
        let mut response = self.inner.round_trip(request).await?;
        self.store_response(&key, &response).await;
        response.extensions_mut().insert(CacheStatus::Miss);
        Ok(response)
    }
}

impl<T, S, K> fmt::Debug for CacheTransport<T, S, K>
where
    T: fmt::Debug,
    S: CacheStore + ?Sized,
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheTransport")
            .field("inner", &self.inner)
            .field("store", &self.store.label())
            .field("key", &self.key)
            .finish()
    }
}

impl<T, S, K> Clone for CacheTransport<T, S, K>
where
    T: Clone,
    S: ?Sized,
    K: Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            store: Arc::clone(&self.store),
            key: self.key.clone(),
        }
    }
}

/// [`Layer`] producing [`CacheTransport`]s that share one store.
pub struct CacheLayer<S: ?Sized, K = FixedKey> {
    store: Arc<S>,
    key: K,
}

impl<S: ?Sized> CacheLayer<S> {
    /// Creates a layer caching into `store` under the default fixed key.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            key: FixedKey::default(),
        }
    }
}

impl<S: ?Sized, K> CacheLayer<S, K> {
    /// Replaces the key extractor.
    pub fn with_key<NK>(self, key: NK) -> CacheLayer<S, NK> {
        CacheLayer {
            store: self.store,
            key,
        }
    }
}

impl<S: ?Sized, K: Clone> Clone for CacheLayer<S, K> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: self.key.clone(),
        }
    }
}

impl<S, K> fmt::Debug for CacheLayer<S, K>
where
    S: CacheStore + ?Sized,
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheLayer")
            .field("store", &self.store.label())
            .field("key", &self.key)
            .finish()
    }
}

impl<T, S: ?Sized, K: Clone> Layer<T> for CacheLayer<S, K> {
    type Service = CacheTransport<T, S, K>;

    fn layer(&self, inner: T) -> Self::Service {
        CacheTransport {
            inner,
            store: Arc::clone(&self.store),
            key: self.key.clone(),
        }
    }
}
