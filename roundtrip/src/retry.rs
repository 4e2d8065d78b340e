use std::fmt;

use async_trait::async_trait;
use http::StatusCode;
use roundtrip_core::{
    Request, RequestExt, Response, Transport, TransportError, TransportResult,
};
use tower::Layer;
use tracing::{debug, trace};

use crate::RetryPolicy;
use crate::metrics;

/// Re-sends a request that failed or got a server error.
///
/// Per round-trip:
///
/// 1. Call the inner transport.
/// 2. If `max_retries` re-attempts were already made, return the outcome as
///    it is, failed or not.
/// 3. If the outcome is a response with a status below 500, return it.
/// 4. Otherwise wait `delay` and go back to 1. If the request's
///    [`RequestContext`](roundtrip_core::RequestContext) fires during the
///    wait, return [`TransportError::Cancelled`] with the last response and
///    make no further attempt.
///
/// The attempt counter lives on the stack of one call; concurrent round-trips
/// through the same `RetryTransport` do not share it.
#[derive(Debug, Clone)]
pub struct RetryTransport<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T> RetryTransport<T> {
    /// Wraps `inner` with `policy`.
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// The policy in effect.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// The wrapped transport.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }
}

/// Why an attempt did not succeed.
enum Failure<'a> {
    Error(&'a TransportError),
    Status(StatusCode),
}

impl fmt::Display for Failure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Error(error) => write!(f, "{error}"),
            Failure::Status(status) => write!(f, "server responded {status}"),
        }
    }
}

fn classify(outcome: &TransportResult<Response>) -> Option<Failure<'_>> {
    match outcome {
        Ok(response) if response.status().as_u16() >= 500 => {
            Some(Failure::Status(response.status()))
        }
        Ok(_) => None,
        Err(error) => Some(Failure::Error(error)),
    }
}

#[async_trait]
impl<T> Transport for RetryTransport<T>
where
    T: Transport,
{
    async fn round_trip(&self, request: &mut Request) -> TransportResult<Response> {
        trace!(method = %request.method(), uri = %request.uri(), "retry roundtrip");
        let context = request.context();
        let mut attempts: u32 = 0;

        loop {
            let outcome = self.inner.round_trip(request).await;
            let failure = classify(&outcome);

            if attempts == self.policy.max_retries {
                if let Some(failure) = failure {
                    debug!(attempts, %failure, "retries exhausted");
                    metrics::retry_exhausted();
                }
                return outcome;
            }

            let Some(failure) = failure else {
                return outcome;
            };

            attempts += 1;
            debug!(
                attempt = attempts,
                max_retries = self.policy.max_retries,
                delay = ?self.policy.delay,
                %failure,
                "waiting before retry"
            );
            metrics::retry_attempt();

            tokio::select! {
                biased;
                reason = context.done() => {
                    debug!(%reason, attempts, "retry wait aborted");
                    metrics::retry_cancelled();
                    return Err(TransportError::Cancelled {
                        reason,
                        last_response: outcome.ok().map(Box::new),
                    });
                }
                _ = tokio::time::sleep(self.policy.delay) => {}
            }
        }
    }
}

/// [`Layer`] producing [`RetryTransport`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryLayer {
    policy: RetryPolicy,
}

impl RetryLayer {
    /// Creates a layer applying `policy`.
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }
}

impl<T> Layer<T> for RetryLayer {
    type Service = RetryTransport<T>;

    fn layer(&self, inner: T) -> Self::Service {
        RetryTransport::new(inner, self.policy)
    }
}
