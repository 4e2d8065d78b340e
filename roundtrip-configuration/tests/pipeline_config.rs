use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use http::StatusCode;
use http::header::AUTHORIZATION;
use pretty_assertions::assert_eq;
use roundtrip::{CacheStatus, RetryPolicy, Transport};
use roundtrip_configuration::{
    BasicAuth, Cache, ConfigError, Key, LayerConfig, Logging, PipelineConfig, Sink, StoreConfig,
};
use roundtrip_test::{MockStore, MockTransport, get};

#[test]
fn full_document_deserializes() {
    let yaml = r#"
layers:
  - BasicAuth: { user: bob, password: pwd }
  - Retry: { max_retries: 5, delay: 250ms }
  - Logging: { sink: Stderr }
  - Cache: { key: MethodUri }
store:
  type: Memory
"#;

    let config = PipelineConfig::from_yaml(yaml).expect("failed to deserialize");

    assert_eq!(
        config,
        PipelineConfig {
            layers: vec![
                LayerConfig::BasicAuth(BasicAuth {
                    user: "bob".to_owned(),
                    password: "pwd".to_owned(),
                }),
                LayerConfig::Retry(RetryPolicy::new(5, Duration::from_millis(250))),
                LayerConfig::Logging(Logging { sink: Sink::Stderr }),
                LayerConfig::Cache(Cache { key: Key::MethodUri }),
            ],
            store: StoreConfig::Memory,
        }
    );
}

#[test]
fn omitted_fields_take_defaults() {
    let yaml = r#"
layers:
  - Retry: {}
  - Logging: {}
  - Cache: {}
"#;

    let config = PipelineConfig::from_yaml(yaml).expect("failed to deserialize");

    assert_eq!(
        config.layers,
        vec![
            LayerConfig::Retry(RetryPolicy::new(3, Duration::from_secs(1))),
            LayerConfig::Logging(Logging { sink: Sink::Stdout }),
            LayerConfig::Cache(Cache {
                key: Key::Fixed("resp".to_owned()),
            }),
        ]
    );
    assert_eq!(config.store, StoreConfig::Memory);
}

#[test]
fn file_sink_deserializes() {
    let yaml = r#"
layers:
  - Logging:
      sink:
        File: { path: /var/log/requests.log }
"#;

    let config = PipelineConfig::from_yaml(yaml).expect("failed to deserialize");

    assert_eq!(
        config.layers,
        vec![LayerConfig::Logging(Logging {
            sink: Sink::File {
                path: PathBuf::from("/var/log/requests.log"),
            },
        })]
    );
}

#[test]
fn unknown_layer_is_rejected() {
    let result = PipelineConfig::from_yaml("layers:\n  - Compress: {}\n");
    assert!(matches!(result, Err(ConfigError::Yaml(_))));
}

#[test]
fn password_is_not_debug_printed() {
    let layer = LayerConfig::BasicAuth(BasicAuth {
        user: "bob".to_owned(),
        password: "hunter2".to_owned(),
    });
    assert!(!format!("{layer:?}").contains("hunter2"));
}

#[tokio::test(start_paused = true)]
async fn layers_wrap_base_in_listed_order() {
    let yaml = r#"
layers:
  - BasicAuth: { user: user, password: pass }
  - Cache: {}
  - Retry: { max_retries: 2, delay: 1s }
"#;
    let upstream = MockTransport::new()
        .then_fail("connection refused")
        .then_respond(StatusCode::OK, "body");
    let store = Arc::new(MockStore::new());

    let transport = PipelineConfig::from_yaml(yaml)
        .unwrap()
        .into_transport_with_store(upstream.clone(), store.clone())
        .unwrap();

    let first = transport.round_trip(&mut get("http://example.com/")).await.unwrap();
    let second = transport.round_trip(&mut get("http://example.com/")).await.unwrap();

    assert_eq!(first.body(), "body");
    assert_eq!(CacheStatus::of(&second), Some(CacheStatus::Hit));
    assert_eq!(upstream.calls(), 2);
    assert_eq!(store.set_count(), 1);
    assert_eq!(
        upstream.requests()[0].headers[AUTHORIZATION],
        "Basic dXNlcjpwYXNz"
    );
}

#[tokio::test]
async fn empty_config_is_the_base_transport() {
    let upstream = MockTransport::new().otherwise_respond(StatusCode::NO_CONTENT, "");
    let transport = PipelineConfig::default().into_transport(upstream.clone()).unwrap();

    let response = transport.round_trip(&mut get("http://example.com/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(upstream.calls(), 1);
}

#[test]
fn unopenable_log_file_fails_assembly() {
    let config = PipelineConfig {
        layers: vec![LayerConfig::Logging(Logging {
            sink: Sink::File {
                path: PathBuf::from("/nonexistent-dir/requests.log"),
            },
        })],
        store: StoreConfig::Memory,
    };

    let result = config.into_transport(MockTransport::new());

    assert!(matches!(result, Err(ConfigError::Sink { .. })));
}

#[test]
fn control_bytes_in_credentials_are_encoded() {
    let config = PipelineConfig {
        layers: vec![LayerConfig::BasicAuth(BasicAuth {
            user: "\u{7f}".to_owned(),
            password: String::new(),
        })],
        store: StoreConfig::default(),
    };

    assert!(config.into_transport(MockTransport::new()).is_ok());
}
