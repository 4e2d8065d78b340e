use async_trait::async_trait;
use bytes::Bytes;
use roundtrip_core::{
    Request, RequestExt, Response, Transport, TransportError, TransportResult,
};
use tracing::{debug, trace};

/// A client able to send a [`reqwest::Request`].
///
/// Implemented for [`reqwest::Client`] and
/// [`reqwest_middleware::ClientWithMiddleware`].
#[async_trait]
pub trait Execute: Send + Sync {
    /// Sends `request` and returns the response head with a streaming body.
    async fn execute(&self, request: reqwest::Request) -> TransportResult<reqwest::Response>;
}

#[async_trait]
impl Execute for reqwest::Client {
    async fn execute(&self, request: reqwest::Request) -> TransportResult<reqwest::Response> {
        reqwest::Client::execute(self, request)
            .await
            .map_err(TransportError::transport)
    }
}

#[async_trait]
impl Execute for reqwest_middleware::ClientWithMiddleware {
    async fn execute(&self, request: reqwest::Request) -> TransportResult<reqwest::Response> {
        reqwest_middleware::ClientWithMiddleware::execute(self, request)
            .await
            .map_err(TransportError::transport)
    }
}

/// Sends requests over the network with a reqwest client.
///
/// Any status code is a successful round-trip; only failures to complete the
/// exchange become [`TransportError::Transport`]. The response body is read
/// to the end before returning.
///
/// If the request carries a [`RequestContext`](roundtrip_core::RequestContext),
/// the exchange is abandoned as soon as it is cancelled or its deadline passes.
#[derive(Debug, Clone)]
pub struct ReqwestTransport<C = reqwest::Client> {
    client: C,
}

impl ReqwestTransport {
    /// Creates a transport with a default [`reqwest::Client`].
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ReqwestTransport<C> {
    /// Creates a transport sending through `client`.
    pub fn with_client(client: C) -> Self {
        Self { client }
    }

    /// The underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }
}

impl<C: Execute> ReqwestTransport<C> {
    async fn exchange(&self, request: reqwest::Request) -> TransportResult<Response> {
        let mut upstream = self.client.execute(request).await?;

        let mut response = Response::new(Bytes::new());
        *response.status_mut() = upstream.status();
        *response.version_mut() = upstream.version();
        *response.headers_mut() = std::mem::take(upstream.headers_mut());
        *response.body_mut() = upstream.bytes().await.map_err(TransportError::transport)?;
        Ok(response)
    }
}

fn to_reqwest(request: &Request) -> TransportResult<reqwest::Request> {
    let mut outgoing = http::Request::new(request.body().clone());
    *outgoing.method_mut() = request.method().clone();
    *outgoing.uri_mut() = request.uri().clone();
    *outgoing.version_mut() = request.version();
    *outgoing.headers_mut() = request.headers().clone();

    reqwest::Request::try_from(outgoing)
        .map_err(|error| TransportError::InvalidRequest(error.to_string()))
}

#[async_trait]
impl<C: Execute> Transport for ReqwestTransport<C> {
    async fn round_trip(&self, request: &mut Request) -> TransportResult<Response> {
        trace!(method = %request.method(), uri = %request.uri(), "sending request");
        let outgoing = to_reqwest(request)?;
        let context = request.context();

        let response = tokio::select! {
            biased;
            reason = context.done() => {
                debug!(%reason, uri = %request.uri(), "request abandoned");
                return Err(TransportError::Cancelled {
                    reason,
                    last_response: None,
                });
            }
            response = self.exchange(outgoing) => response?,
        };

        debug!(status = %response.status(), uri = %request.uri(), "received response");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_uri_is_invalid() {
        let request = http::Request::get("/only/a/path").body(Bytes::new()).unwrap();
        assert!(matches!(
            to_reqwest(&request),
            Err(TransportError::InvalidRequest(_))
        ));
    }

    #[test]
    fn conversion_keeps_method_headers_and_body() {
        let request = http::Request::post("http://example.com/submit")
            .header("x-trace", "abc")
            .body(Bytes::from_static(b"payload"))
            .unwrap();

        let converted = to_reqwest(&request).unwrap();

        assert_eq!(converted.method(), http::Method::POST);
        assert_eq!(converted.url().as_str(), "http://example.com/submit");
        assert_eq!(converted.headers()["x-trace"], "abc");
        assert_eq!(
            converted.body().and_then(|body| body.as_bytes()),
            Some(&b"payload"[..])
        );
    }
}
