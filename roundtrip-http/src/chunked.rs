//! Single-chunk encoding and full decoding of `Transfer-Encoding: chunked`.

use bytes::{BufMut, Bytes, BytesMut};

use crate::{WireError, WireResult};

pub(crate) fn encode(body: &[u8], out: &mut BytesMut) {
    if !body.is_empty() {
        out.put_slice(format!("{:x}\r\n", body.len()).as_bytes());
        out.put_slice(body);
        out.put_slice(b"\r\n");
    }
    out.put_slice(b"0\r\n\r\n");
}

pub(crate) fn decode(mut input: &[u8]) -> WireResult<Bytes> {
    let mut body = BytesMut::new();
    loop {
        let (consumed, size) = match httparse::parse_chunk_size(input) {
            Ok(httparse::Status::Complete(parsed)) => parsed,
            Ok(httparse::Status::Partial) | Err(_) => return Err(WireError::Chunked),
        };
        input = &input[consumed..];
        let size = usize::try_from(size).map_err(|_| WireError::Chunked)?;

        if size == 0 {
            // Trailers are not kept; only require the final CRLF to be there.
            return if input.windows(2).any(|w| w == b"\r\n") {
                Ok(body.freeze())
            } else {
                Err(WireError::Chunked)
            };
        }

        let end = size.checked_add(2).ok_or(WireError::Chunked)?;
        if input.len() < end || &input[size..end] != b"\r\n" {
            return Err(WireError::Chunked);
        }
        body.put_slice(&input[..size]);
        input = &input[end..];
    }
}
