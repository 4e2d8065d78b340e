//! The round-trip capability shared by the base transport and all decorators.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{Request, Response, TransportResult};

/// Anything that can execute a request and produce a response or a failure.
///
/// The base network transport implements this trait, and so does every
/// decorator wrapping it. A decorator holds its inner transport and delegates
/// to it, doing its own work before and after the call.
///
/// The request stays owned by the caller for the whole round-trip. Layers
/// borrow it mutably so credentials can be injected in place and retries can
/// replay the same request without cloning it.
///
/// Implementations are shared between concurrent round-trips, hence `&self`
/// and the `Send + Sync` bound.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use bytes::Bytes;
/// use roundtrip_core::{Request, Response, Transport, TransportResult};
///
/// struct Teapot;
///
/// #[async_trait]
/// impl Transport for Teapot {
///     async fn round_trip(&self, _request: &mut Request) -> TransportResult<Response> {
///         let mut response = Response::new(Bytes::from_static(b"short and stout"));
///         *response.status_mut() = http::StatusCode::IM_A_TEAPOT;
///         Ok(response)
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Executes one request-to-response exchange.
    async fn round_trip(&self, request: &mut Request) -> TransportResult<Response>;
}

/// Type-erased transport, used when a pipeline is assembled at runtime.
pub type BoxTransport = Arc<dyn Transport>;

#[async_trait]
impl<T> Transport for &T
where
    T: Transport + ?Sized,
{
    async fn round_trip(&self, request: &mut Request) -> TransportResult<Response> {
        (**self).round_trip(request).await
    }
}

#[async_trait]
impl<T> Transport for Box<T>
where
    T: Transport + ?Sized,
{
    async fn round_trip(&self, request: &mut Request) -> TransportResult<Response> {
        (**self).round_trip(request).await
    }
}

#[async_trait]
impl<T> Transport for Arc<T>
where
    T: Transport + ?Sized,
{
    async fn round_trip(&self, request: &mut Request) -> TransportResult<Response> {
        (**self).round_trip(request).await
    }
}
