use std::io::Write;
use std::sync::Arc;

use roundtrip_core::{BoxTransport, Transport};
use tower::ServiceBuilder;
use tower::layer::Layer;
use tower::layer::util::{Identity, Stack};

use crate::{BasicAuthLayer, CacheLayer, Credentials, LoggingLayer, RetryLayer, RetryPolicy};

/// Builder for a chain of transport decorators.
///
/// Layers are listed from the caller inwards: the first one added sees the
/// request first and the response last. The chain is closed over a base
/// transport with [`transport`](Self::transport) or [`boxed`](Self::boxed).
///
/// ```
/// use std::sync::Arc;
///
/// use roundtrip::{Credentials, Pipeline, RetryPolicy};
/// use roundtrip_store::MemoryStore;
/// # use roundtrip_core::{Request, Response, Transport, TransportResult};
/// # struct Base;
/// # #[async_trait::async_trait]
/// # impl Transport for Base {
/// #     async fn round_trip(&self, _: &mut Request) -> TransportResult<Response> {
/// #         Ok(Response::new(bytes::Bytes::new()))
/// #     }
/// # }
///
/// let transport = Pipeline::new()
///     .basic_auth(Credentials::new("user", "secret").unwrap())
///     .retry(RetryPolicy::default())
///     .logging(std::io::sink())
///     .cache(Arc::new(MemoryStore::new()))
///     .boxed(Base);
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline<L> {
    builder: ServiceBuilder<L>,
}

impl Default for Pipeline<Identity> {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline<Identity> {
    /// Starts an empty chain.
    pub fn new() -> Self {
        Self {
            builder: ServiceBuilder::new(),
        }
    }
}

impl<L> Pipeline<L> {
    /// Adds an arbitrary layer inside the ones already added.
    pub fn layer<T>(self, layer: T) -> Pipeline<Stack<T, L>> {
        Pipeline {
            builder: self.builder.layer(layer),
        }
    }

    /// Adds basic authentication.
    pub fn basic_auth(self, credentials: Credentials) -> Pipeline<Stack<BasicAuthLayer, L>> {
        self.layer(BasicAuthLayer::new(credentials))
    }

    /// Adds retrying.
    pub fn retry(self, policy: RetryPolicy) -> Pipeline<Stack<RetryLayer, L>> {
        self.layer(RetryLayer::new(policy))
    }

    /// Adds request logging to `sink`.
    pub fn logging<W: Write>(self, sink: W) -> Pipeline<Stack<LoggingLayer<W>, L>> {
        self.layer(LoggingLayer::new(sink))
    }

    /// Adds response caching into `store` under the default single slot.
    pub fn cache<S: ?Sized>(self, store: Arc<S>) -> Pipeline<Stack<CacheLayer<S>, L>> {
        self.layer(CacheLayer::new(store))
    }

    /// Adds response caching into `store`, keyed by `key`.
    pub fn cache_with_key<S: ?Sized, K>(
        self,
        store: Arc<S>,
        key: K,
    ) -> Pipeline<Stack<CacheLayer<S, K>, L>> {
        self.layer(CacheLayer::new(store).with_key(key))
    }

    /// Returns the underlying layer stack.
    pub fn into_inner(self) -> L {
        self.builder.into_inner()
    }

    /// Wraps `base` in the chain.
    pub fn transport<T>(&self, base: T) -> L::Service
    where
        L: Layer<T>,
    {
        self.builder.service(base)
    }

    /// Wraps `base` in the chain and erases the resulting type.
    pub fn boxed<T>(&self, base: T) -> BoxTransport
    where
        L: Layer<T>,
        L::Service: Transport + 'static,
    {
        Arc::new(self.transport(base))
    }
}

