use bytes::Bytes;

use crate::{WireError, WireResult};

/// Reason phrase of a status line that differs from the canonical one.
///
/// Lives in the response extensions. [`serialize_response`](crate::serialize_response)
/// writes it in place of the canonical phrase, and
/// [`parse_response`](crate::parse_response) attaches it when the stored
/// status line carries a non-canonical phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasonPhrase(Bytes);

impl ReasonPhrase {
    /// Validates `reason` for use in a status line.
    ///
    /// # Errors
    ///
    /// [`WireError::InvalidReason`] when it contains CR, LF or another
    /// control byte other than horizontal tab.
    pub fn new(reason: impl Into<Bytes>) -> WireResult<Self> {
        let reason = reason.into();
        if reason.iter().any(|&b| (b < 0x20 && b != b'\t') || b == 0x7f) {
            return Err(WireError::InvalidReason);
        }
        Ok(Self(reason))
    }

    /// The raw phrase.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}
