use bytes::Bytes;
use http::header::{CONTENT_LENGTH, HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode, Version};
use roundtrip_core::Response;

use crate::{ReasonPhrase, WireError, WireResult, chunked, is_chunked};

const INITIAL_HEADER_CAPACITY: usize = 64;
const MAX_HEADER_CAPACITY: usize = 4096;

/// Reads a response from its HTTP/1.x wire form.
///
/// The body is the decoded chunk stream when the response is chunked, the
/// next `Content-Length` bytes when that header is present, and everything
/// after the header block otherwise.
///
/// # Errors
///
/// Any [`WireError`] describing what was wrong with the input.
pub fn parse_response(input: &[u8]) -> WireResult<Response> {
    let mut capacity = INITIAL_HEADER_CAPACITY;
    loop {
        match parse_with_capacity(input, capacity) {
            Err(WireError::Head(httparse::Error::TooManyHeaders))
                if capacity < MAX_HEADER_CAPACITY =>
            {
                capacity *= 4;
            }
            result => return result,
        }
    }
}

fn parse_with_capacity(input: &[u8], capacity: usize) -> WireResult<Response> {
    let mut raw_headers = vec![httparse::EMPTY_HEADER; capacity];
    let mut head = httparse::Response::new(&mut raw_headers);

    let head_len = match head.parse(input)? {
        httparse::Status::Complete(len) => len,
        httparse::Status::Partial => return Err(WireError::IncompleteHead),
    };

    let version = match head.version {
        Some(0) => Version::HTTP_10,
        Some(1) => Version::HTTP_11,
        Some(other) => return Err(WireError::UnsupportedVersion(other)),
        None => return Err(WireError::IncompleteHead),
    };
    let code = head.code.ok_or(WireError::IncompleteHead)?;
    let status = StatusCode::from_u16(code).map_err(|_| WireError::InvalidStatus(code))?;
    let reason = match head.reason {
        Some(reason) if !reason.is_empty() && status.canonical_reason() != Some(reason) => {
            Some(ReasonPhrase::new(Bytes::copy_from_slice(reason.as_bytes()))?)
        }
        _ => None,
    };

    let mut headers = HeaderMap::with_capacity(head.headers.len());
    for header in head.headers.iter() {
        let name = HeaderName::from_bytes(header.name.as_bytes())
            .map_err(|e| WireError::InvalidHeader(format!("{}: {e}", header.name)))?;
        let value = HeaderValue::from_bytes(header.value)
            .map_err(|e| WireError::InvalidHeader(format!("{}: {e}", header.name)))?;
        headers.append(name, value);
    }

    let rest = &input[head_len..];
    let body = if is_chunked(&headers) {
        chunked::decode(rest)?
    } else if let Some(declared) = headers.get(CONTENT_LENGTH) {
        let length = declared
            .to_str()
            .ok()
            .and_then(|value| value.trim().parse::<usize>().ok())
            .filter(|length| *length <= rest.len())
            .ok_or_else(|| WireError::ContentLength {
                declared: String::from_utf8_lossy(declared.as_bytes()).into_owned(),
                actual: rest.len(),
            })?;
        Bytes::copy_from_slice(&rest[..length])
    } else {
        Bytes::copy_from_slice(rest)
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.version_mut() = version;
    *response.headers_mut() = headers;
    if let Some(reason) = reason {
        response.extensions_mut().insert(reason);
    }
    Ok(response)
}
