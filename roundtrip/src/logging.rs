use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{Local, SecondsFormat};
use roundtrip_core::{Request, Response, Transport, TransportResult};
use tower::Layer;
use tracing::warn;

/// Writes one line per round-trip, then delegates.
///
/// The line has the form
///
/// ```text
/// [2024-05-01T12:00:00+02:00] - GET http://example.com/get
/// ```
///
/// with the local time in RFC 3339, the method, and the full URI. It is
/// written before the inner transport is called, so a request is logged once
/// per invocation of this layer whatever the outcome. Write failures are
/// reported through `tracing` and never fail the round-trip.
pub struct LoggingTransport<T, W> {
    inner: T,
    sink: Arc<Mutex<W>>,
}

impl<T, W> LoggingTransport<T, W> {
    /// Wraps `inner`, logging to `sink`.
    pub fn new(inner: T, sink: W) -> Self {
        Self::shared(inner, Arc::new(Mutex::new(sink)))
    }

    /// Wraps `inner`, logging to a sink shared with other owners.
    pub fn shared(inner: T, sink: Arc<Mutex<W>>) -> Self {
        Self { inner, sink }
    }

    /// The wrapped transport.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }
}

impl<T, W: Write> LoggingTransport<T, W> {
    fn write_line(&self, request: &Request) -> io::Result<()> {
        let now = Local::now().to_rfc3339_opts(SecondsFormat::Secs, false);
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(sink, "[{now}] - {} {}", request.method(), request.uri())?;
        sink.flush()
    }
}

#[async_trait]
impl<T, W> Transport for LoggingTransport<T, W>
where
    T: Transport,
    W: Write + Send,
{
    async fn round_trip(&self, request: &mut Request) -> TransportResult<Response> {
        if let Err(error) = self.write_line(request) {
            warn!(%error, "failed to write request log line");
        }
        self.inner.round_trip(request).await
    }
}

impl<T: fmt::Debug, W> fmt::Debug for LoggingTransport<T, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingTransport")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<T: Clone, W> Clone for LoggingTransport<T, W> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            sink: Arc::clone(&self.sink),
        }
    }
}

/// [`Layer`] producing [`LoggingTransport`]s that share one sink.
pub struct LoggingLayer<W> {
    sink: Arc<Mutex<W>>,
}

impl<W> LoggingLayer<W> {
    /// Creates a layer logging to `sink`.
    pub fn new(sink: W) -> Self {
        Self::shared(Arc::new(Mutex::new(sink)))
    }

    /// Creates a layer logging to a sink shared with other owners.
    pub fn shared(sink: Arc<Mutex<W>>) -> Self {
        Self { sink }
    }
}

impl LoggingLayer<io::Stdout> {
    /// Creates a layer logging to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl LoggingLayer<io::Stderr> {
    /// Creates a layer logging to standard error.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W> Clone for LoggingLayer<W> {
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
        }
    }
}

impl<W> fmt::Debug for LoggingLayer<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingLayer").finish_non_exhaustive()
    }
}

impl<T, W> Layer<T> for LoggingLayer<W> {
    type Service = LoggingTransport<T, W>;

    fn layer(&self, inner: T) -> Self::Service {
        LoggingTransport::shared(inner, Arc::clone(&self.sink))
    }
}
