//! The client: verb methods over the normalize → intercept → transport →
//! resolve pipeline.
//!
//! # Design
//! `ClientConfig` is a consuming builder. `Client::new` freezes it behind an
//! `Arc`, resolving the transport once, so clones share one immutable
//! configuration and concurrent calls never contend on anything.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::error::{Error, ResponseError};
use crate::http::{Credentials, HttpMethod};
use crate::interceptor::{
    error_interceptor, pass_request, pass_response, reject_response, request_interceptor,
    success_interceptor, ErrorInterceptor, RequestInterceptor, SuccessInterceptor,
};
use crate::request::{GetOptions, RequestOptions, ResolvedRequest};
use crate::response::{self, Response};
use crate::transport::{self, Transport};

/// Construction-time configuration for a `Client`.
#[derive(Clone)]
pub struct ClientConfig {
    base_url: Option<String>,
    credentials: Option<Credentials>,
    transport: Option<Arc<dyn Transport>>,
    request_interceptor: RequestInterceptor,
    response_success_interceptor: SuccessInterceptor,
    response_error_interceptor: ErrorInterceptor,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            credentials: None,
            transport: None,
            request_interceptor: request_interceptor(pass_request),
            response_success_interceptor: success_interceptor(pass_response),
            response_error_interceptor: error_interceptor(reject_response),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix for relative request paths.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Credentials policy used when a request does not set its own.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn request_interceptor<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(ResolvedRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ResolvedRequest, Error>> + Send + 'static,
    {
        self.request_interceptor = request_interceptor(f);
        self
    }

    pub fn response_success_interceptor<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(ResolvedRequest, Response) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, Error>> + Send + 'static,
    {
        self.response_success_interceptor = success_interceptor(f);
        self
    }

    pub fn response_error_interceptor<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(ResponseError) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, Error>> + Send + 'static,
    {
        self.response_error_interceptor = error_interceptor(f);
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

/// Async HTTP client with a base URL, default credentials and interceptors.
#[derive(Debug, Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
}

impl Client {
    /// Freeze `config`. Without an explicit transport, the global transport
    /// registered at this moment is used; if there is none, every request
    /// fails with `Error::NoTransport`.
    pub fn new(mut config: ClientConfig) -> Self {
        config.transport = transport::discover(config.transport.take());
        if config.transport.is_none() {
            tracing::warn!("no transport configured or registered; requests will fail");
        }
        Self {
            config: Arc::new(config),
        }
    }

    pub fn base_url(&self) -> Option<&str> {
        self.config.base_url.as_deref()
    }

    pub async fn get(&self, path: &str, options: GetOptions) -> Result<Response, Error> {
        self.request(HttpMethod::Get, path, options.into()).await
    }

    pub async fn post(&self, path: &str, options: RequestOptions) -> Result<Response, Error> {
        self.request(HttpMethod::Post, path, options).await
    }

    pub async fn put(&self, path: &str, options: RequestOptions) -> Result<Response, Error> {
        self.request(HttpMethod::Put, path, options).await
    }

    pub async fn patch(&self, path: &str, options: RequestOptions) -> Result<Response, Error> {
        self.request(HttpMethod::Patch, path, options).await
    }

    pub async fn delete(&self, path: &str, options: RequestOptions) -> Result<Response, Error> {
        self.request(HttpMethod::Delete, path, options).await
    }

    /// Run one request through the full pipeline. The result is whatever
    /// the success or error interceptor returns.
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response, Error> {
        let config = &self.config;
        let transport = config.transport.as_ref().ok_or(Error::NoTransport)?;

        let resolved = ResolvedRequest::resolve(
            method,
            path,
            options,
            config.base_url.as_deref(),
            config.credentials,
        );
        let resolved = (config.request_interceptor)(resolved).await?;

        match transport::invoke(transport.as_ref(), &resolved).await? {
            Ok(raw) => {
                response::resolve(
                    resolved,
                    raw,
                    &config.response_success_interceptor,
                    &config.response_error_interceptor,
                )
                .await
            }
            Err(cause) => {
                let err = ResponseError::new(resolved, Response::transport_failure(), Some(cause));
                (config.response_error_interceptor)(err).await
            }
        }
    }
}
