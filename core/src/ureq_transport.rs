//! Blocking HTTP transport built on `ureq`, driven from tokio's blocking
//! pool so it can sit behind the async `Transport` trait.
//!
//! Requires a running tokio runtime. The credentials policy is a browser
//! concept and has no effect here.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use ureq::typestate::WithBody;
use ureq::RequestBuilder;

use crate::error::TransportError;
use crate::http::{Headers, HttpMethod};
use crate::transport::{set_global_transport, FetchOptions, RawResponse, Transport, TransportResponse};

/// `Transport` backed by a shared `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Transport over a default agent. Non-2xx statuses are returned as data
    /// so the client can classify them.
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Transport over a caller-configured agent. The agent should have
    /// `http_status_as_error` disabled.
    pub fn from_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UreqTransport")
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn fetch(
        &self,
        url: &str,
        options: FetchOptions,
    ) -> Result<Box<dyn TransportResponse>, TransportError> {
        let agent = self.agent.clone();
        let url = url.to_string();
        let response = tokio::task::spawn_blocking(move || execute(&agent, &url, options))
            .await
            .map_err(|e| TransportError::Other(e.to_string()))??;
        Ok(Box::new(response))
    }
}

/// Register a default `UreqTransport` as the process-wide fallback.
/// Returns `false` if a global transport was already registered.
///
/// Requests sent through it must run inside a tokio runtime, since each
/// one is handed to `spawn_blocking`.
pub fn install_default_transport() -> bool {
    set_global_transport(Arc::new(UreqTransport::new())).is_ok()
}

fn execute(agent: &ureq::Agent, url: &str, options: FetchOptions) -> Result<RawResponse, TransportError> {
    if let Some(credentials) = options.credentials {
        tracing::trace!(%credentials, "credentials policy ignored by ureq transport");
    }

    let headers = &options.headers;
    let result = match options.method {
        HttpMethod::Get => {
            if options.body.is_some() {
                tracing::debug!(url, "GET request body dropped by ureq transport");
            }
            with_headers(agent.get(url), headers).call()
        }
        HttpMethod::Delete => {
            let builder = with_headers(agent.delete(url), headers);
            match options.body {
                Some(body) => builder.force_send_body().send(body.as_bytes()),
                None => builder.call(),
            }
        }
        HttpMethod::Post => send(with_headers(agent.post(url), headers), options.body),
        HttpMethod::Put => send(with_headers(agent.put(url), headers), options.body),
        HttpMethod::Patch => send(with_headers(agent.patch(url), headers), options.body),
    };

    let mut response = result.map_err(map_error)?;
    let status = response.status().as_u16();
    let headers: Headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| TransportError::Body(e.to_string()));

    Ok(RawResponse {
        status,
        headers,
        body,
    })
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send(
    builder: RequestBuilder<WithBody>,
    body: Option<String>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}

fn map_error(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Timeout(_) => TransportError::Timeout,
        ureq::Error::Io(e) => TransportError::Connection(e.to_string()),
        ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => {
            TransportError::Connection(err.to_string())
        }
        other => TransportError::Other(other.to_string()),
    }
}
