//! Error types for round-trips.

use std::error::Error as StdError;

use thiserror::Error;

use crate::{CancelReason, Response};

/// Result of a single round-trip.
pub type TransportResult<T> = Result<T, TransportError>;

/// Failures that travel back up the transport chain.
///
/// A response with a server-error status is *not* an error: it comes back as
/// `Ok(response)` and only the retry layer looks at the status code.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The base transport could not complete the exchange.
    ///
    /// Connection, TLS and protocol failures all end up here. Decorators pass
    /// it through unchanged; the retry layer treats it as retryable.
    #[error(transparent)]
    Transport(Box<dyn StdError + Send + Sync>),

    /// The request's cancellation or deadline fired while a layer was waiting.
    ///
    /// Carries the response of the last attempt when there was one, so the
    /// caller still sees what the server said before the wait was aborted.
    #[error("round-trip aborted: {reason}")]
    Cancelled {
        /// Which signal fired.
        reason: CancelReason,
        /// Response produced by the last attempt before the abort.
        last_response: Option<Box<Response>>,
    },

    /// The request cannot be expressed by the base transport.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl TransportError {
    /// Wraps any error as a transport failure.
    pub fn transport<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Transport(Box::new(error))
    }

    /// Returns `true` if the round-trip was aborted by cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
