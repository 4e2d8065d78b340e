#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]
//! # roundtrip
//!
//! Decorators for outbound HTTP transports.
//!
//! Every decorator wraps an inner [`Transport`] and is itself a
//! [`Transport`], so a chain of them can be put in front of any base
//! transport. Four decorators are provided:
//!
//! | Decorator | Effect |
//! |-----------|--------|
//! | [`BasicAuthTransport`] | sets the `Authorization` header |
//! | [`RetryTransport`] | re-sends on transport errors and 5xx responses |
//! | [`LoggingTransport`] | writes one line per request |
//! | [`CacheTransport`] | replays stored responses from a [`CacheStore`](roundtrip_store::CacheStore) |
//!
//! Each has a matching [`tower::Layer`], and [`Pipeline`] stacks them in
//! order from the caller inwards:
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use roundtrip::{Credentials, Pipeline, RetryPolicy};
//! use roundtrip_core::{Request, Response, Transport, TransportResult};
//! use roundtrip_store::MemoryStore;
//!
//! struct Upstream;
//!
//! #[async_trait::async_trait]
//! impl Transport for Upstream {
//!     async fn round_trip(&self, _request: &mut Request) -> TransportResult<Response> {
//!         Ok(Response::new("hello".into()))
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = Arc::new(MemoryStore::new());
//! let transport = Pipeline::new()
//!     .basic_auth(Credentials::new("user", "secret").unwrap())
//!     .retry(RetryPolicy::new(3, Duration::from_secs(1)))
//!     .logging(std::io::sink())
//!     .cache(Arc::clone(&store))
//!     .boxed(Upstream);
//!
//! let mut request = http::Request::get("http://example.com/").body(Default::default()).unwrap();
//! let response = transport.round_trip(&mut request).await.unwrap();
//! assert_eq!(response.body(), "hello");
//! assert_eq!(store.len(), 1);
//! # }
//! ```
//!
//! # Features
//!
//! - `metrics` - emit cache and retry counters through the `metrics` crate.

/// Basic authentication.
pub mod auth;
/// Response caching.
pub mod cache;
/// Request logging.
pub mod logging;
pub mod metrics;
/// Chain assembly.
pub mod pipeline;
/// Retry configuration.
pub mod policy;
/// Retrying.
pub mod retry;

pub use auth::{BasicAuthLayer, BasicAuthTransport, Credentials};
pub use cache::{CacheLayer, CacheTransport};
pub use logging::{LoggingLayer, LoggingTransport};
pub use pipeline::Pipeline;
pub use policy::{RetryPolicy, RetryPolicyBuilder};
pub use retry::{RetryLayer, RetryTransport};

pub use roundtrip_core::{
    BoxTransport, CacheStatus, CancelReason, FixedKey, KeyExtractor, MethodUri, Request,
    RequestContext, RequestExt, Response, Transport, TransportError, TransportResult,
};
