//! Counter values recorded by the cache and retry layers.

#![cfg(feature = "metrics")]

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::StatusCode;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use metrics_util::{CompositeKey, MetricKind};
use roundtrip::{CacheTransport, RequestContext, RequestExt, RetryPolicy, RetryTransport, Transport};
use roundtrip_store::{CacheStore, MemoryStore};
use roundtrip_test::{MockTransport, get};

type SnapshotEntry = (
    CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
);

fn counter(entries: &[SnapshotEntry], name: &str) -> Option<u64> {
    entries.iter().find_map(|(key, _, _, value)| {
        if key.kind() == MetricKind::Counter
            && key.key().name() == name
            && let DebugValue::Counter(v) = *value
        {
            Some(v)
        } else {
            None
        }
    })
}

/// Runs `future` on a paused current-thread runtime with a local recorder.
fn record<F: Future<Output = ()>>(future: F) -> Vec<SnapshotEntry> {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .start_paused(true)
            .build()
            .unwrap();
        rt.block_on(future);
    });

    snapshotter.snapshot().into_vec()
}

#[test]
fn cache_counts_miss_then_hit() {
    let entries = record(async {
        let cache = CacheTransport::new(MockTransport::new(), Arc::new(MemoryStore::new()));
        cache.round_trip(&mut get("http://example.com/")).await.unwrap();
        cache.round_trip(&mut get("http://example.com/")).await.unwrap();
        cache.round_trip(&mut get("http://example.com/")).await.unwrap();
    });

    assert_eq!(counter(&entries, "roundtrip_cache_miss_total"), Some(1));
    assert_eq!(counter(&entries, "roundtrip_cache_hit_total"), Some(2));
    assert_eq!(counter(&entries, "roundtrip_cache_bypass_total"), None);
}

#[test]
fn cache_counts_bypass() {
    let entries = record(async {
        let store = Arc::new(MemoryStore::new());
        store.set("resp", Bytes::new()).await.unwrap();
        let cache = CacheTransport::new(MockTransport::new(), store);
        cache.round_trip(&mut get("http://example.com/")).await.unwrap();
    });

    assert_eq!(counter(&entries, "roundtrip_cache_bypass_total"), Some(1));
    assert_eq!(counter(&entries, "roundtrip_cache_miss_total"), None);
}

#[test]
fn retry_counts_attempts_and_exhaustion() {
    let entries = record(async {
        let upstream = MockTransport::new().otherwise_fail("connection refused");
        let retry = RetryTransport::new(upstream, RetryPolicy::new(2, Duration::from_secs(1)));
        assert!(retry.round_trip(&mut get("http://example.com/")).await.is_err());
    });

    assert_eq!(counter(&entries, "roundtrip_retry_total"), Some(2));
    assert_eq!(counter(&entries, "roundtrip_retry_exhausted_total"), Some(1));
    assert_eq!(counter(&entries, "roundtrip_retry_cancelled_total"), None);
}

#[test]
fn retry_counts_cancellation() {
    let entries = record(async {
        let upstream = MockTransport::new().otherwise_respond(StatusCode::BAD_GATEWAY, "");
        let retry = RetryTransport::new(upstream, RetryPolicy::new(2, Duration::from_secs(1)));
        let context = RequestContext::new();
        context.cancel();
        let mut request = get("http://example.com/").with_context(context);
        assert!(retry.round_trip(&mut request).await.is_err());
    });

    assert_eq!(counter(&entries, "roundtrip_retry_total"), Some(1));
    assert_eq!(counter(&entries, "roundtrip_retry_cancelled_total"), Some(1));
    assert_eq!(counter(&entries, "roundtrip_retry_exhausted_total"), None);
}
