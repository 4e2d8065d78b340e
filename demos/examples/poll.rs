//! Polling Example
//!
//! Sends `GET http://httpbin.org/get` once a second through a configured
//! pipeline until interrupted.
//!
//! Run:
//!   cargo run -p roundtrip-demos --example poll
//!   cargo run -p roundtrip-demos --example poll -- pipeline.yaml
//!
//! Stop with Ctrl-C, or send SIGTERM / SIGHUP. A retry wait in progress is
//! aborted at once.

use std::time::Duration;

use bytes::Bytes;
use roundtrip_configuration::PipelineConfig;
use roundtrip_core::{RequestContext, RequestExt, Transport, TransportError};
use roundtrip_reqwest::ReqwestTransport;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

const TARGET: &str = "http://httpbin.org/get";

const DEFAULT_PIPELINE: &str = r#"
layers:
  - BasicAuth: { user: user, password: secret }
  - Retry: { max_retries: 3, delay: 1s }
  - Logging: { sink: Stdout }
  - Cache: { key: { Fixed: resp } }
store:
  type: Memory
"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("info,roundtrip=debug")
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => PipelineConfig::from_yaml(&std::fs::read_to_string(path)?)?,
        None => PipelineConfig::from_yaml(DEFAULT_PIPELINE)?,
    };
    let transport = config.into_transport(ReqwestTransport::new())?;

    let shutdown = CancellationToken::new();
    tokio::spawn(wait_for_signal(shutdown.clone()));

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let mut request = http::Request::get(TARGET)
            .body(Bytes::new())?
            .with_context(RequestContext::from_token(shutdown.child_token()));

        let started = Instant::now();
        match transport.round_trip(&mut request).await {
            Ok(response) => {
                println!("status: {}", response.status());
                println!("{}", String::from_utf8_lossy(response.body()));
            }
            Err(TransportError::Cancelled { .. }) => break,
            Err(error) => tracing::error!(%error, "request failed"),
        }
        println!("elapsed: {:?}", started.elapsed());
    }

    tracing::info!("shutting down");
    Ok(())
}

async fn wait_for_signal(shutdown: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let (Ok(mut terminate), Ok(mut hangup)) = (
            signal(SignalKind::terminate()),
            signal(SignalKind::hangup()),
        ) else {
            tracing::warn!("cannot install signal handlers, falling back to Ctrl-C");
            if let Err(error) = tokio::signal::ctrl_c().await {
                tracing::warn!(%error, "cannot listen for Ctrl-C");
            }
            shutdown.cancel();
            return;
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = terminate.recv() => {}
            _ = hangup.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::warn!(%error, "cannot listen for Ctrl-C");
        }
    }

    tracing::info!("signal received");
    shutdown.cancel();
}
