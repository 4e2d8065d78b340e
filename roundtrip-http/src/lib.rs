//! HTTP/1.x wire codec for cached responses.
//!
//! The cache stores a response exactly as it would appear on the wire:
//! status line, header block, blank line, body. [`serialize_response`]
//! produces that form and [`parse_response`] reads it back, so that
//! `parse_response(&serialize_response(&r)?)` has the same status, headers
//! and body bytes as `r`. A non-canonical reason phrase survives the trip as
//! a [`ReasonPhrase`] extension.
//!
//! ```
//! use bytes::Bytes;
//! use roundtrip_core::Response;
//! use roundtrip_http::{parse_response, serialize_response};
//!
//! let mut response = Response::new(Bytes::from_static(b"{\"ok\":true}"));
//! response
//!     .headers_mut()
//!     .insert(http::header::CONTENT_TYPE, "application/json".parse().unwrap());
//!
//! let wire = serialize_response(&response).unwrap();
//! assert!(wire.starts_with(b"HTTP/1.1 200 OK\r\n"));
//!
//! let replayed = parse_response(&wire).unwrap();
//! assert_eq!(replayed.status(), response.status());
//! assert_eq!(replayed.headers(), response.headers());
//! assert_eq!(replayed.body(), response.body());
//! ```

mod chunked;
mod error;
mod parse;
mod reason;
mod serialize;

pub use error::{WireError, WireResult};
pub use parse::parse_response;
pub use reason::ReasonPhrase;
pub use serialize::serialize_response;

use http::HeaderMap;
use http::header::TRANSFER_ENCODING;

/// Returns `true` when the final transfer coding is `chunked`.
pub(crate) fn is_chunked(headers: &HeaderMap) -> bool {
    headers
        .get_all(TRANSFER_ENCODING)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|coding| !coding.is_empty())
        .last()
        .is_some_and(|coding| coding.eq_ignore_ascii_case("chunked"))
}
