use std::sync::Arc;

use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use roundtrip::{CacheStatus, CacheTransport, MethodUri, Transport, TransportError};
use roundtrip_http::parse_response;
use roundtrip_store::{CacheStore, MemoryStore};
use roundtrip_test::{MockStore, MockTransport, get, request, text_response};

#[tokio::test]
async fn miss_calls_upstream_and_stores_once() {
    let expected = text_response(StatusCode::OK, "fresh");
    let upstream = MockTransport::new().then_respond_with(
        expected.status(),
        expected.headers().clone(),
        "fresh",
    );
    let store = Arc::new(MockStore::new());
    let cache = CacheTransport::new(upstream.clone(), Arc::clone(&store));

    let response = cache.round_trip(&mut get("http://example.com/a")).await.unwrap();

    assert_eq!(response.status(), expected.status());
    assert_eq!(response.headers(), expected.headers());
    assert_eq!(response.body(), expected.body());
    assert_eq!(CacheStatus::of(&response), Some(CacheStatus::Miss));
    assert_eq!(upstream.calls(), 1);
    assert_eq!(store.get_count(), 1);
    assert_eq!(store.hit_count(), 0);
    assert_eq!(store.miss_count(), 1);
    assert_eq!(store.set_count(), 1);

    let stored = store.inner().get("resp").await.unwrap();
    let replayed = parse_response(&stored).unwrap();
    assert_eq!(replayed.status(), response.status());
    assert_eq!(replayed.headers(), response.headers());
    assert_eq!(replayed.body(), response.body());
}

#[tokio::test]
async fn hit_replays_without_calling_upstream() {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    let upstream = MockTransport::new()
        .then_respond_with(StatusCode::CREATED, headers, "{\"id\":1}")
        .otherwise_respond(StatusCode::OK, "second");
    let store = Arc::new(MockStore::new());
    let cache = CacheTransport::new(upstream.clone(), Arc::clone(&store));

    cache.round_trip(&mut get("http://example.com/a")).await.unwrap();
    let replayed = cache.round_trip(&mut get("http://example.com/a")).await.unwrap();

    assert_eq!(upstream.calls(), 1);
    assert_eq!(store.get_count(), 2);
    assert_eq!(store.miss_count(), 1);
    assert_eq!(store.hit_count(), 1);
    assert_eq!(store.set_count(), 1);
    assert_eq!(replayed.status(), StatusCode::CREATED);
    assert_eq!(replayed.headers()[CONTENT_TYPE], "application/json");
    assert_eq!(replayed.body(), "{\"id\":1}");
    assert_eq!(CacheStatus::of(&replayed), Some(CacheStatus::Hit));
}

#[tokio::test]
async fn fixed_slot_is_shared_by_every_request() {
    let upstream = MockTransport::new()
        .then_respond(StatusCode::OK, "first")
        .otherwise_respond(StatusCode::OK, "other");
    let cache = CacheTransport::new(upstream.clone(), Arc::new(MemoryStore::new()));

    cache.round_trip(&mut get("http://example.com/a")).await.unwrap();
    let response = cache
        .round_trip(&mut request(Method::POST, "http://other.org/b"))
        .await
        .unwrap();

    assert_eq!(response.body(), "first");
    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn method_uri_keys_separate_slots() {
    let upstream = MockTransport::new()
        .then_respond(StatusCode::OK, "a")
        .then_respond(StatusCode::OK, "b");
    let store = Arc::new(MemoryStore::new());
    let cache = CacheTransport::new(upstream.clone(), Arc::clone(&store)).with_key(MethodUri);

    cache.round_trip(&mut get("http://example.com/a")).await.unwrap();
    cache.round_trip(&mut get("http://example.com/b")).await.unwrap();
    let again = cache.round_trip(&mut get("http://example.com/a")).await.unwrap();

    assert_eq!(upstream.calls(), 2);
    assert_eq!(store.len(), 2);
    assert_eq!(again.body(), "a");
    assert_eq!(CacheStatus::of(&again), Some(CacheStatus::Hit));
}

#[tokio::test]
async fn empty_entry_bypasses_without_writing() {
    let upstream = MockTransport::new().otherwise_respond(StatusCode::OK, "live");
    let store = Arc::new(MockStore::new());
    store.inner().set("resp", Bytes::new()).await.unwrap();
    let cache = CacheTransport::new(upstream.clone(), Arc::clone(&store));

    let first = cache.round_trip(&mut get("http://example.com/")).await.unwrap();
    let second = cache.round_trip(&mut get("http://example.com/")).await.unwrap();

    assert_eq!(first.body(), "live");
    assert_eq!(CacheStatus::of(&second), Some(CacheStatus::Bypass));
    assert_eq!(upstream.calls(), 2);
    assert_eq!(store.set_count(), 0);
    assert_eq!(store.inner().get("resp").await.unwrap(), Bytes::new());
}

#[tokio::test]
async fn unreadable_entry_bypasses_without_writing() {
    let upstream = MockTransport::new().otherwise_respond(StatusCode::OK, "live");
    let store = Arc::new(MockStore::new());
    store
        .inner()
        .set("resp", Bytes::from_static(b"not an http response"))
        .await
        .unwrap();
    let cache = CacheTransport::new(upstream.clone(), Arc::clone(&store));

    let response = cache.round_trip(&mut get("http://example.com/")).await.unwrap();

    assert_eq!(response.body(), "live");
    assert_eq!(CacheStatus::of(&response), Some(CacheStatus::Bypass));
    assert_eq!(upstream.calls(), 1);
    assert_eq!(store.set_count(), 0);
}

#[tokio::test]
async fn upstream_error_is_returned_and_nothing_stored() {
    let upstream = MockTransport::new().then_fail("connection refused");
    let store = Arc::new(MockStore::new());
    let cache = CacheTransport::new(upstream.clone(), Arc::clone(&store));

    let error = cache.round_trip(&mut get("http://example.com/")).await.unwrap_err();

    assert!(matches!(error, TransportError::Transport(_)));
    assert_eq!(store.set_count(), 0);
    assert!(store.inner().is_empty());
}

#[tokio::test]
async fn upstream_error_on_bypass_is_returned() {
    let upstream = MockTransport::new().then_fail("connection reset");
    let store = Arc::new(MemoryStore::new());
    store.set("resp", Bytes::new()).await.unwrap();
    let cache = CacheTransport::new(upstream, store);

    let result = cache.round_trip(&mut get("http://example.com/")).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn server_errors_are_cached_too() {
    let upstream = MockTransport::new()
        .then_respond(StatusCode::BAD_GATEWAY, "bad")
        .otherwise_respond(StatusCode::OK, "good");
    let cache = CacheTransport::new(upstream.clone(), Arc::new(MemoryStore::new()));

    cache.round_trip(&mut get("http://example.com/")).await.unwrap();
    let response = cache.round_trip(&mut get("http://example.com/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn read_failure_is_treated_as_miss() {
    let upstream = MockTransport::new().otherwise_respond(StatusCode::OK, "live");
    let store = Arc::new(MockStore::new());
    store.fail_reads(true);
    let cache = CacheTransport::new(upstream.clone(), Arc::clone(&store));

    let response = cache.round_trip(&mut get("http://example.com/")).await.unwrap();

    assert_eq!(response.body(), "live");
    assert_eq!(CacheStatus::of(&response), Some(CacheStatus::Miss));
    assert_eq!(store.set_count(), 1);
}

#[tokio::test]
async fn write_failure_does_not_fail_the_round_trip() {
    let upstream = MockTransport::new().otherwise_respond(StatusCode::OK, "live");
    let store = Arc::new(MockStore::new());
    store.fail_writes(true);
    let cache = CacheTransport::new(upstream.clone(), Arc::clone(&store));

    let response = cache.round_trip(&mut get("http://example.com/")).await.unwrap();

    assert_eq!(response.body(), "live");
    assert_eq!(store.set_count(), 1);
    assert!(store.inner().is_empty());
}

#[tokio::test]
async fn unserializable_response_is_returned_but_not_stored() {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_LENGTH, HeaderValue::from_static("99"));
    let upstream = MockTransport::new().then_respond_with(StatusCode::OK, headers, "short");
    let store = Arc::new(MockStore::new());
    let cache = CacheTransport::new(upstream, Arc::clone(&store));

    let response = cache.round_trip(&mut get("http://example.com/")).await.unwrap();

    assert_eq!(response.body(), "short");
    assert_eq!(store.set_count(), 0);
}

#[tokio::test]
async fn trait_object_store_is_accepted() {
    let store: Arc<dyn CacheStore> = Arc::new(MemoryStore::new());
    let upstream = MockTransport::new();
    let cache = CacheTransport::new(upstream.clone(), store);

    cache.round_trip(&mut get("http://example.com/")).await.unwrap();
    cache.round_trip(&mut get("http://example.com/")).await.unwrap();

    assert_eq!(upstream.calls(), 1);
}
