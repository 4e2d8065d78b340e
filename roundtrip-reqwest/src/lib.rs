//! # roundtrip-reqwest
//!
//! Base [`Transport`](roundtrip_core::Transport) that performs the real HTTP
//! exchange with [`reqwest`].
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use roundtrip::{Pipeline, RetryPolicy, Transport};
//! use roundtrip_reqwest::ReqwestTransport;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = Pipeline::new()
//!     .retry(RetryPolicy::default())
//!     .boxed(ReqwestTransport::new());
//!
//! let mut request = http::Request::get("http://httpbin.org/get").body(Default::default())?;
//! let response = transport.round_trip(&mut request).await?;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```
//!
//! A [`reqwest_middleware::ClientWithMiddleware`] can be used in place of a
//! plain client, so existing reqwest middleware stays below the roundtrip
//! layers.

mod transport;

pub use transport::{Execute, ReqwestTransport};

/// Re-export of the client type for convenience.
pub use reqwest::Client;
