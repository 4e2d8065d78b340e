//! Per-request cancellation context and per-response cache markers.
//!
//! Both travel in the `http` extensions of the message they belong to, so the
//! [`Transport`](crate::Transport) signature stays a plain request/response
//! pair.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::Request;

/// Why a request stopped waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The request's cancellation token was triggered.
    Cancelled,
    /// The request's deadline passed.
    DeadlineExceeded,
}

impl CancelReason {
    /// Returns the reason as a string slice.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            CancelReason::Cancelled => "context canceled",
            CancelReason::DeadlineExceeded => "context deadline exceeded",
        }
    }
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cancellation signal and optional deadline attached to a request.
///
/// Clones share the same token: cancelling any clone cancels them all.
/// Child contexts created with [`child`](Self::child) are cancelled together
/// with their parent but can also be cancelled on their own.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use bytes::Bytes;
/// use roundtrip_core::{Request, RequestContext, RequestExt};
///
/// let context = RequestContext::new().with_timeout(Duration::from_secs(5));
/// let mut request = Request::new(Bytes::new());
/// request.set_context(context.clone());
///
/// context.cancel();
/// assert!(request.context().is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// Creates a context that is only cancelled explicitly.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context driven by an existing cancellation token.
    pub fn from_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Creates a context cancelled whenever this one is.
    ///
    /// The child inherits the deadline.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Sets an absolute deadline. An earlier existing deadline is kept.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    /// Sets a deadline `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Returns the deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancels the context and every clone or child of it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns `true` once the token was cancelled or the deadline passed.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled() || self.deadline.is_some_and(|d| d <= Instant::now())
    }

    /// Waits until the context is cancelled or its deadline passes.
    ///
    /// Never resolves for a context without a deadline that nobody cancels.
    pub async fn done(&self) -> CancelReason {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    _ = self.token.cancelled() => CancelReason::Cancelled,
                    _ = tokio::time::sleep_until(deadline) => CancelReason::DeadlineExceeded,
                }
            }
            None => {
                self.token.cancelled().await;
                CancelReason::Cancelled
            }
        }
    }
}

/// Access to the [`RequestContext`] stored in a request's extensions.
pub trait RequestExt {
    /// Returns the request's context, or a fresh never-cancelled one.
    fn context(&self) -> RequestContext;

    /// Attaches a context, replacing any previous one.
    fn set_context(&mut self, context: RequestContext);

    /// Builder-style variant of [`set_context`](Self::set_context).
    fn with_context(mut self, context: RequestContext) -> Self
    where
        Self: Sized,
    {
        self.set_context(context);
        self
    }
}

impl RequestExt for Request {
    fn context(&self) -> RequestContext {
        self.extensions()
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_default()
    }

    fn set_context(&mut self, context: RequestContext) {
        self.extensions_mut().insert(context);
    }
}

/// Whether a response was replayed from cache or fetched from the network.
///
/// The cache layer stores it in the response extensions, leaving the headers
/// exactly as the server sent them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheStatus {
    /// Replayed from a stored entry; the inner transport was not called.
    Hit,
    /// No entry; fetched from the inner transport and stored.
    #[default]
    Miss,
    /// An entry existed but was unusable; fetched without storing.
    Bypass,
}

impl CacheStatus {
    /// Returns the status as a string slice.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "hit",
            CacheStatus::Miss => "miss",
            CacheStatus::Bypass => "bypass",
        }
    }

    /// Reads the status the cache layer left on a response.
    pub fn of(response: &crate::Response) -> Option<CacheStatus> {
        response.extensions().get::<CacheStatus>().copied()
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn deadline_fires() {
        let context = RequestContext::new().with_timeout(Duration::from_millis(50));
        assert!(!context.is_cancelled());

        let reason = context.done().await;
        assert_eq!(reason, CancelReason::DeadlineExceeded);
        assert!(context.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_wins_over_later_deadline() {
        let context = RequestContext::new().with_timeout(Duration::from_secs(60));
        context.cancel();
        assert_eq!(context.done().await, CancelReason::Cancelled);
    }

    #[test]
    fn earlier_deadline_is_kept() {
        let now = Instant::now();
        let context = RequestContext::new()
            .with_deadline(now + Duration::from_secs(1))
            .with_deadline(now + Duration::from_secs(10));
        assert_eq!(context.deadline(), Some(now + Duration::from_secs(1)));
    }

    #[test]
    fn child_follows_parent() {
        let parent = RequestContext::new();
        let child = parent.child();
        parent.cancel();
        assert!(child.is_cancelled());

        let parent = RequestContext::new();
        let child = parent.child();
        child.cancel();
        assert!(!parent.is_cancelled());
    }

    #[test]
    fn request_without_context_is_never_cancelled() {
        let request = Request::new(Bytes::new());
        assert!(!request.context().is_cancelled());
    }

    #[test]
    fn context_travels_in_extensions() {
        let context = RequestContext::new();
        let request = Request::new(Bytes::new()).with_context(context.clone());
        context.cancel();
        assert!(request.context().is_cancelled());
    }
}
