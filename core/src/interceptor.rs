//! Interceptor hooks and their defaults.
//!
//! Interceptors are plain async functions stored in the client's
//! configuration. The request interceptor may rewrite the resolved request
//! before it is sent. The success and error interceptors decide what the
//! caller finally gets back: the defaults pass successes through unchanged
//! and turn failures into `Error::Response`. An error interceptor that
//! returns `Ok` makes a failed request resolve to a value instead.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::error::{Error, ResponseError};
use crate::request::ResolvedRequest;
use crate::response::Response;

pub type RequestInterceptor =
    Arc<dyn Fn(ResolvedRequest) -> BoxFuture<'static, Result<ResolvedRequest, Error>> + Send + Sync>;

pub type SuccessInterceptor =
    Arc<dyn Fn(ResolvedRequest, Response) -> BoxFuture<'static, Result<Response, Error>> + Send + Sync>;

pub type ErrorInterceptor =
    Arc<dyn Fn(ResponseError) -> BoxFuture<'static, Result<Response, Error>> + Send + Sync>;

pub fn request_interceptor<F, Fut>(f: F) -> RequestInterceptor
where
    F: Fn(ResolvedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ResolvedRequest, Error>> + Send + 'static,
{
    Arc::new(move |request| f(request).boxed())
}

pub fn success_interceptor<F, Fut>(f: F) -> SuccessInterceptor
where
    F: Fn(ResolvedRequest, Response) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, Error>> + Send + 'static,
{
    Arc::new(move |request, response| f(request, response).boxed())
}

pub fn error_interceptor<F, Fut>(f: F) -> ErrorInterceptor
where
    F: Fn(ResponseError) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, Error>> + Send + 'static,
{
    Arc::new(move |err| f(err).boxed())
}

/// Default request interceptor: sends the request unchanged.
pub async fn pass_request(request: ResolvedRequest) -> Result<ResolvedRequest, Error> {
    Ok(request)
}

/// Default success interceptor: returns the response unchanged.
pub async fn pass_response(_request: ResolvedRequest, response: Response) -> Result<Response, Error> {
    Ok(response)
}

/// Default error interceptor: logs the failure and fails the call with it.
pub async fn reject_response(err: ResponseError) -> Result<Response, Error> {
    tracing::error!(
        method = %err.request.method,
        url = %err.request.url,
        status = err.status(),
        cause = ?err.cause,
        "request failed"
    );
    Err(Error::from(err))
}
