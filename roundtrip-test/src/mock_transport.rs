use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode, Uri};
use roundtrip_core::{Request, Response, Transport, TransportError, TransportResult};

#[derive(Debug, Clone)]
enum Step {
    Respond {
        status: StatusCode,
        headers: HeaderMap,
        body: Bytes,
    },
    Fail(&'static str),
}

impl Step {
    fn play(&self) -> TransportResult<Response> {
        match self {
            Step::Respond {
                status,
                headers,
                body,
            } => {
                let mut response = Response::new(body.clone());
                *response.status_mut() = *status;
                *response.headers_mut() = headers.clone();
                Ok(response)
            }
            Step::Fail(message) => Err(TransportError::transport(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                *message,
            ))),
        }
    }
}

/// What the mock saw for one call.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request method.
    pub method: Method,
    /// Request URI.
    pub uri: Uri,
    /// Request headers at the moment the mock was called.
    pub headers: HeaderMap,
}

#[derive(Debug)]
struct Inner {
    script: Mutex<VecDeque<Step>>,
    fallback: Mutex<Step>,
    calls: AtomicUsize,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Scripted stand-in for the base transport.
///
/// Each call pops the next scripted step; once the script runs out every call
/// plays the fallback (`200 OK`, empty body, unless changed). Clones share
/// script, counters and recordings, so a test can keep a handle after moving
/// the mock into a pipeline.
///
/// ```
/// use http::StatusCode;
/// use roundtrip_test::MockTransport;
///
/// let transport = MockTransport::new()
///     .then_fail("connection refused")
///     .then_respond(StatusCode::OK, "hello");
/// # let _ = transport;
/// ```
#[derive(Debug, Clone)]
pub struct MockTransport {
    inner: Arc<Inner>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// Creates a mock that answers `200 OK` with an empty body.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                script: Mutex::new(VecDeque::new()),
                fallback: Mutex::new(Step::Respond {
                    status: StatusCode::OK,
                    headers: HeaderMap::new(),
                    body: Bytes::new(),
                }),
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Queues a response.
    pub fn then_respond(self, status: StatusCode, body: &'static str) -> Self {
        self.then_respond_with(status, HeaderMap::new(), body)
    }

    /// Queues a response with headers.
    pub fn then_respond_with(self, status: StatusCode, headers: HeaderMap, body: &'static str) -> Self {
        self.push(Step::Respond {
            status,
            headers,
            body: Bytes::from_static(body.as_bytes()),
        })
    }

    /// Queues a transport failure.
    pub fn then_fail(self, message: &'static str) -> Self {
        self.push(Step::Fail(message))
    }

    /// Answers every unscripted call with this response.
    pub fn otherwise_respond(self, status: StatusCode, body: &'static str) -> Self {
        *self.inner.fallback.lock().unwrap() = Step::Respond {
            status,
            headers: HeaderMap::new(),
            body: Bytes::from_static(body.as_bytes()),
        };
        self
    }

    /// Fails every unscripted call.
    pub fn otherwise_fail(self, message: &'static str) -> Self {
        *self.inner.fallback.lock().unwrap() = Step::Fail(message);
        self
    }

    /// Number of round-trips received so far.
    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    /// Every request received, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.requests.lock().unwrap().clone()
    }

    fn push(self, step: Step) -> Self {
        self.inner.script.lock().unwrap().push_back(step);
        self
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn round_trip(&self, request: &mut Request) -> TransportResult<Response> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.requests.lock().unwrap().push(RecordedRequest {
            method: request.method().clone(),
            uri: request.uri().clone(),
            headers: request.headers().clone(),
        });

        let step = self.inner.script.lock().unwrap().pop_front();
        match step {
            Some(step) => step.play(),
            None => self.inner.fallback.lock().unwrap().play(),
        }
    }
}
