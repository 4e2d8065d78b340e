use bytes::{BufMut, Bytes, BytesMut};
use http::Version;
use http::header::CONTENT_LENGTH;
use roundtrip_core::Response;

use crate::{ReasonPhrase, WireError, WireResult, chunked, is_chunked};

/// Writes `response` in HTTP/1.x wire form.
///
/// The status line uses `HTTP/1.0` for HTTP/1.0 responses and `HTTP/1.1` for
/// everything else. A chunked response is re-framed as a single chunk. The
/// response is only borrowed, its body stays readable afterwards.
///
/// # Errors
///
/// [`WireError::ContentLength`] when a `Content-Length` header disagrees with
/// the buffered body, since the result could not be read back.
pub fn serialize_response(response: &Response) -> WireResult<Bytes> {
    let headers = response.headers();
    let body = response.body();
    let chunked = is_chunked(headers);

    if !chunked && let Some(declared) = headers.get(CONTENT_LENGTH) {
        let matches = declared
            .to_str()
            .ok()
            .and_then(|value| value.trim().parse::<usize>().ok())
            .is_some_and(|length| length == body.len());
        if !matches {
            return Err(WireError::ContentLength {
                declared: String::from_utf8_lossy(declared.as_bytes()).into_owned(),
                actual: body.len(),
            });
        }
    }

    let mut out = BytesMut::with_capacity(128 + headers.len() * 32 + body.len());

    let version = match response.version() {
        Version::HTTP_10 => "HTTP/1.0",
        _ => "HTTP/1.1",
    };
    let status = response.status();
    out.put_slice(format!("{version} {}", status.as_u16()).as_bytes());
    let reason = match response.extensions().get::<ReasonPhrase>() {
        Some(reason) => Some(reason.as_bytes()),
        None => status.canonical_reason().map(str::as_bytes),
    };
    if let Some(reason) = reason {
        out.put_u8(b' ');
        out.put_slice(reason);
    }
    out.put_slice(b"\r\n");

    for (name, value) in headers {
        out.put_slice(name.as_str().as_bytes());
        out.put_slice(b": ");
        out.put_slice(value.as_bytes());
        out.put_slice(b"\r\n");
    }
    out.put_slice(b"\r\n");

    if chunked {
        chunked::encode(body, &mut out);
    } else {
        out.put_slice(body);
    }

    Ok(out.freeze())
}
