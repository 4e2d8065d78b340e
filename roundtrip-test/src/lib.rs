//! Test doubles shared by the roundtrip crates' test suites.
//!
//! - [`MockTransport`] stands in for the network: it plays back a script of
//!   responses and failures and records every request it sees.
//! - [`MockStore`] wraps a [`MemoryStore`](roundtrip_store::MemoryStore) and
//!   counts reads and writes.

mod mock_store;
mod mock_transport;

pub use mock_store::MockStore;
pub use mock_transport::{MockTransport, RecordedRequest};

use bytes::Bytes;
use http::{HeaderValue, Method, StatusCode};
use roundtrip_core::{Request, Response};

/// Builds a `GET` request for `uri`.
pub fn get(uri: &str) -> Request {
    request(Method::GET, uri)
}

/// Builds a bodyless request.
pub fn request(method: Method, uri: &str) -> Request {
    let mut request = Request::new(Bytes::new());
    *request.method_mut() = method;
    *request.uri_mut() = uri.parse().expect("valid test uri");
    request
}

/// Builds a response with a `content-type: text/plain` header.
pub fn text_response(status: StatusCode, body: &'static str) -> Response {
    let mut response = Response::new(Bytes::from_static(body.as_bytes()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(http::header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    response
}
