//! Metrics declaration and recording.
//!
//! With the `metrics` feature enabled, counters are emitted through the
//! [`metrics`](https://docs.rs/metrics) facade; install any recorder to
//! collect them. Without the feature every function here is a no-op.

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

use roundtrip_core::CacheStatus;

#[cfg(feature = "metrics")]
lazy_static! {
    /// Track number of responses replayed from cache.
    pub static ref CACHE_HIT_COUNTER: &'static str = {
        metrics::describe_counter!(
            "roundtrip_cache_hit_total",
            "Total number of responses replayed from cache."
        );
        "roundtrip_cache_hit_total"
    };
    /// Track number of cache misses sent upstream.
    pub static ref CACHE_MISS_COUNTER: &'static str = {
        metrics::describe_counter!(
            "roundtrip_cache_miss_total",
            "Total number of cache misses sent upstream."
        );
        "roundtrip_cache_miss_total"
    };
    /// Track number of unusable cache entries bypassed.
    pub static ref CACHE_BYPASS_COUNTER: &'static str = {
        metrics::describe_counter!(
            "roundtrip_cache_bypass_total",
            "Total number of unusable cache entries bypassed."
        );
        "roundtrip_cache_bypass_total"
    };
    /// Track number of re-attempts.
    pub static ref RETRY_COUNTER: &'static str = {
        metrics::describe_counter!(
            "roundtrip_retry_total",
            "Total number of re-attempts made by the retry layer."
        );
        "roundtrip_retry_total"
    };
    /// Track number of round-trips that ran out of retries.
    pub static ref RETRY_EXHAUSTED_COUNTER: &'static str = {
        metrics::describe_counter!(
            "roundtrip_retry_exhausted_total",
            "Total number of round-trips that failed after the last retry."
        );
        "roundtrip_retry_exhausted_total"
    };
    /// Track number of retry waits aborted by cancellation.
    pub static ref RETRY_CANCELLED_COUNTER: &'static str = {
        metrics::describe_counter!(
            "roundtrip_retry_cancelled_total",
            "Total number of retry waits aborted by cancellation."
        );
        "roundtrip_retry_cancelled_total"
    };
}

#[cfg(feature = "metrics")]
#[inline]
pub(crate) fn cache(status: CacheStatus) {
    let name: &'static str = match status {
        CacheStatus::Hit => *CACHE_HIT_COUNTER,
        CacheStatus::Miss => *CACHE_MISS_COUNTER,
        CacheStatus::Bypass => *CACHE_BYPASS_COUNTER,
    };
    metrics::counter!(name).increment(1);
}

#[cfg(not(feature = "metrics"))]
#[inline]
pub(crate) fn cache(_status: CacheStatus) {}

#[cfg(feature = "metrics")]
#[inline]
pub(crate) fn retry_attempt() {
    metrics::counter!(*RETRY_COUNTER).increment(1);
}

#[cfg(not(feature = "metrics"))]
#[inline]
pub(crate) fn retry_attempt() {}

#[cfg(feature = "metrics")]
#[inline]
pub(crate) fn retry_exhausted() {
    metrics::counter!(*RETRY_EXHAUSTED_COUNTER).increment(1);
}

#[cfg(not(feature = "metrics"))]
#[inline]
pub(crate) fn retry_exhausted() {}

#[cfg(feature = "metrics")]
#[inline]
pub(crate) fn retry_cancelled() {
    metrics::counter!(*RETRY_CANCELLED_COUNTER).increment(1);
}

#[cfg(not(feature = "metrics"))]
#[inline]
pub(crate) fn retry_cancelled() {}
