use std::fmt;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use http::header::{AUTHORIZATION, HeaderValue, InvalidHeaderValue};
use roundtrip_core::{Request, Response, Transport, TransportResult};
use smol_str::SmolStr;
use tower::Layer;
use tracing::trace;

/// Username and password sent with every request.
///
/// The `Authorization` header value is computed once, when the credentials
/// are created, and marked sensitive so it is redacted from `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    user: SmolStr,
    header: HeaderValue,
}

impl Credentials {
    /// Builds credentials for `user` and `password`.
    ///
    /// Fails only if the encoded value is not a valid header value, which
    /// cannot happen for base64 output but is checked rather than assumed.
    pub fn new(
        user: impl Into<SmolStr>,
        password: impl AsRef<str>,
    ) -> Result<Self, InvalidHeaderValue> {
        let user = user.into();
        let encoded = STANDARD.encode(format!("{}:{}", user, password.as_ref()));
        let mut header = HeaderValue::from_str(&format!("Basic {encoded}"))?;
        header.set_sensitive(true);
        Ok(Self { user, header })
    }

    /// The username.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// The `Authorization` header value.
    pub fn header_value(&self) -> &HeaderValue {
        &self.header
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Sets the `Authorization` header before delegating.
///
/// Any `Authorization` header already on the request is replaced. The header
/// is set on the caller's request, so layers below this one and the caller
/// itself observe it after the call.
#[derive(Debug, Clone)]
pub struct BasicAuthTransport<T> {
    inner: T,
    credentials: Credentials,
}

impl<T> BasicAuthTransport<T> {
    /// Wraps `inner`, authenticating with `credentials`.
    pub fn new(inner: T, credentials: Credentials) -> Self {
        Self { inner, credentials }
    }

    /// The wrapped transport.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T> Transport for BasicAuthTransport<T>
where
    T: Transport,
{
    async fn round_trip(&self, request: &mut Request) -> TransportResult<Response> {
        trace!(user = %self.credentials.user, "setting basic auth");
        request
            .headers_mut()
            .insert(AUTHORIZATION, self.credentials.header.clone());
        self.inner.round_trip(request).await
    }
}

/// [`Layer`] producing [`BasicAuthTransport`]s.
#[derive(Debug, Clone)]
pub struct BasicAuthLayer {
    credentials: Credentials,
}

impl BasicAuthLayer {
    /// Creates a layer authenticating with `credentials`.
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl<T> Layer<T> for BasicAuthLayer {
    type Service = BasicAuthTransport<T>;

    fn layer(&self, inner: T) -> Self::Service {
        BasicAuthTransport::new(inner, self.credentials.clone())
    }
}
