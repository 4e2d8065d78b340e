#![warn(missing_docs)]
//! # roundtrip-core
//!
//! Core traits and types for composable outbound HTTP transports.
//!
//! A [`Transport`] executes one request and produces one response. The base
//! network transport and every decorator built on top of it implement the
//! same trait, so they can be nested in any order:
//!
//! ```text
//! caller -> auth -> retry -> logging -> cache -> base transport
//! ```
//!
//! This crate holds the pieces every layer shares:
//!
//! - [`Request`] / [`Response`] - buffered `http` messages
//! - [`Transport`] - the round-trip capability
//! - [`TransportError`] - failures that travel back up the chain
//! - [`RequestContext`] - cancellation and deadline attached to a request
//! - [`KeyExtractor`] - cache slot selection for a request
//! - [`CacheStatus`] - marker left on responses by the cache layer

pub mod context;
pub mod error;
pub mod key;
pub mod transport;

pub use context::{CacheStatus, CancelReason, RequestContext, RequestExt};
pub use error::{TransportError, TransportResult};
pub use key::{DEFAULT_CACHE_KEY, FixedKey, KeyExtractor, MethodUri};
#[doc(hidden)]
pub use smol_str::SmolStr;
pub use transport::{BoxTransport, Transport};

/// Outbound request with a fully buffered body.
pub type Request = http::Request<bytes::Bytes>;

/// Inbound response with a fully buffered body.
pub type Response = http::Response<bytes::Bytes>;
