//! The transport seam: the function that actually performs the network call.
//!
//! # Design
//! A `Transport` takes a URL plus `FetchOptions` and yields a
//! `TransportResponse` whose body is read separately, so status and
//! headers are available before the body read (which may fail on its
//! own). Closures become transports through `transport_fn`.
//!
//! When a client is built without a transport it falls back to the one
//! registered process-wide with `set_global_transport`. That lookup
//! happens once, at client construction.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;

use crate::error::{Error, TransportError};
use crate::http::{Credentials, Headers, HttpMethod};
use crate::request::ResolvedRequest;

/// Options handed to the transport alongside the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    pub method: HttpMethod,
    pub headers: Headers,
    pub body: Option<String>,
    pub credentials: Option<Credentials>,
}

impl FetchOptions {
    /// Encode `request` for the wire. The structured body is JSON-encoded
    /// here; the raw body is only used when there is no structured body.
    pub fn from_request(request: &ResolvedRequest) -> Result<Self, Error> {
        let body = match &request.body {
            Some(value) => Some(serde_json::to_string(value)?),
            None => request.body_raw.clone(),
        };
        Ok(Self {
            method: request.method,
            headers: request.headers.clone(),
            body,
            credentials: request.credentials,
        })
    }
}

/// Performs a single HTTP exchange.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Send the request. `Err` means no response was obtained at all.
    async fn fetch(
        &self,
        url: &str,
        options: FetchOptions,
    ) -> Result<Box<dyn TransportResponse>, TransportError>;
}

/// A response as returned by a transport, before its body is read.
#[async_trait]
pub trait TransportResponse: Send {
    fn status(&self) -> u16;

    /// Header pairs as received. Repeated names are allowed.
    fn headers(&self) -> Headers;

    /// Consume the response and read its body as text.
    async fn text(self: Box<Self>) -> Result<String, TransportError>;
}

/// A fully buffered response. Used by the bundled transports and handy
/// for scripting responses in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: Result<String, TransportError>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Ok(body.into()),
        }
    }

    /// A response whose body read fails with `error`.
    pub fn unreadable(status: u16, error: TransportError) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Err(error),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

#[async_trait]
impl TransportResponse for RawResponse {
    fn status(&self) -> u16 {
        self.status
    }

    fn headers(&self) -> Headers {
        self.headers.clone()
    }

    async fn text(self: Box<Self>) -> Result<String, TransportError> {
        self.body
    }
}

/// Adapter turning an async closure into a `Transport`.
pub struct FnTransport<F> {
    f: F,
}

/// Wrap `f` as a transport. `f` receives the final URL and fetch options.
pub fn transport_fn<F, Fut, R>(f: F) -> FnTransport<F>
where
    F: Fn(String, FetchOptions) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, TransportError>> + Send + 'static,
    R: TransportResponse + 'static,
{
    FnTransport { f }
}

impl<F> fmt::Debug for FnTransport<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FnTransport")
    }
}

#[async_trait]
impl<F, Fut, R> Transport for FnTransport<F>
where
    F: Fn(String, FetchOptions) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, TransportError>> + Send + 'static,
    R: TransportResponse + 'static,
{
    async fn fetch(
        &self,
        url: &str,
        options: FetchOptions,
    ) -> Result<Box<dyn TransportResponse>, TransportError> {
        let response = (self.f)(url.to_string(), options).await?;
        Ok(Box::new(response))
    }
}

static GLOBAL_TRANSPORT: OnceLock<Arc<dyn Transport>> = OnceLock::new();

/// Register the process-wide fallback transport. Can only be set once;
/// a second call hands the rejected transport back.
pub fn set_global_transport(transport: Arc<dyn Transport>) -> Result<(), Arc<dyn Transport>> {
    GLOBAL_TRANSPORT.set(transport)
}

/// The process-wide fallback transport, if one was registered.
pub fn global_transport() -> Option<Arc<dyn Transport>> {
    GLOBAL_TRANSPORT.get().cloned()
}

/// Pick the transport for a new client: the explicit one, else the global
/// one, else none.
pub(crate) fn discover(explicit: Option<Arc<dyn Transport>>) -> Option<Arc<dyn Transport>> {
    explicit.or_else(global_transport)
}

/// Run the transport for `request`.
///
/// The outer `Result` carries encoding failures, which abort the call. The
/// inner one is the transport outcome, which the caller routes to the
/// response interceptors.
pub(crate) async fn invoke(
    transport: &dyn Transport,
    request: &ResolvedRequest,
) -> Result<Result<Box<dyn TransportResponse>, TransportError>, Error> {
    let options = FetchOptions::from_request(request)?;
    tracing::debug!(method = %options.method, url = %request.url, "sending request");
    Ok(transport.fetch(&request.url, options).await)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::request::RequestOptions;

    fn resolved(options: RequestOptions) -> ResolvedRequest {
        ResolvedRequest::resolve(HttpMethod::Post, "/x", options, None, None)
    }

    #[test]
    fn structured_body_is_json_encoded() {
        let req = resolved(RequestOptions::new().body(json!({"abc": 123})));
        let options = FetchOptions::from_request(&req).unwrap();
        assert_eq!(options.body.as_deref(), Some(r#"{"abc":123}"#));
    }

    #[test]
    fn raw_body_passes_through() {
        let req = resolved(RequestOptions::new().body_raw("plain text"));
        let options = FetchOptions::from_request(&req).unwrap();
        assert_eq!(options.body.as_deref(), Some("plain text"));
    }

    #[test]
    fn structured_body_wins_over_raw_body() {
        let req = resolved(RequestOptions::new().body(json!(1)).body_raw("ignored"));
        let options = FetchOptions::from_request(&req).unwrap();
        assert_eq!(options.body.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn fn_transport_forwards_url_and_options() {
        let transport = transport_fn(|url, options: FetchOptions| async move {
            Ok(RawResponse::new(201, format!("{} {url}", options.method)).with_header("X-Id", "7"))
        });
        let req = resolved(RequestOptions::new());
        let response = invoke(&transport, &req).await.unwrap().unwrap();
        assert_eq!(response.status(), 201);
        assert_eq!(response.headers(), vec![("X-Id".to_string(), "7".to_string())]);
        assert_eq!(response.text().await.unwrap(), "POST /x");
    }

    #[tokio::test]
    async fn transport_failure_is_returned_not_raised() {
        let transport = transport_fn(|_, _| async {
            Err::<RawResponse, _>(TransportError::Connection("refused".to_string()))
        });
        let req = resolved(RequestOptions::new());
        let outcome = invoke(&transport, &req).await.unwrap();
        assert_eq!(
            outcome.err(),
            Some(TransportError::Connection("refused".to_string()))
        );
    }
}
