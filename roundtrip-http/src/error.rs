use thiserror::Error;

/// Result of a wire codec operation.
pub type WireResult<T> = Result<T, WireError>;

/// Errors raised while writing or reading the wire form of a response.
#[derive(Debug, Error)]
pub enum WireError {
    /// Header block could not be parsed.
    #[error("malformed response head: {0}")]
    Head(#[from] httparse::Error),

    /// Input ended before the header block did.
    #[error("incomplete response head")]
    IncompleteHead,

    /// Only HTTP/1.0 and HTTP/1.1 are representable.
    #[error("unsupported HTTP version 1.{0}")]
    UnsupportedVersion(u8),

    /// Status code outside 100..=999.
    #[error("invalid status code {0}")]
    InvalidStatus(u16),

    /// A header name or value is not valid.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// `Content-Length` is not a number, or does not match the body.
    #[error("content-length mismatch: declared {declared:?}, body has {actual} bytes")]
    ContentLength {
        /// The raw declared value.
        declared: String,
        /// Number of body bytes available.
        actual: usize,
    },

    /// A reason phrase contains a line break or control byte.
    #[error("invalid reason phrase")]
    InvalidReason,

    /// Chunked body framing is broken.
    #[error("malformed chunked body")]
    Chunked,
}
