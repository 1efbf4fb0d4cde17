//! Error types for the fetch wrapper.
//!
//! # Design
//! `NoTransport` is a misconfigured client and never reaches an
//! interceptor. HTTP failures and transport failures both travel through
//! the error interceptor as a `ResponseError`; the default interceptor
//! turns that into `Error::Response`. Transport failures are the only
//! case where the response status is `0`.

use std::fmt;

use thiserror::Error;

use crate::request::ResolvedRequest;
use crate::response::Response;

/// Errors returned by `Client` request methods.
#[derive(Debug, Error)]
pub enum Error {
    /// No transport was supplied and none is registered globally.
    #[error("no transport available: pass one to ClientConfig or register a global transport")]
    NoTransport,

    /// The error interceptor rejected a failed request.
    #[error(transparent)]
    Response(Box<ResponseError>),

    /// The structured request body could not be encoded as JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The decoded response body did not match the requested type.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// Raised by user-supplied interceptors.
    #[error("{0}")]
    Custom(String),
}

impl From<ResponseError> for Error {
    fn from(err: ResponseError) -> Self {
        Error::Response(Box::new(err))
    }
}

/// Failure raised by a `Transport` before a response could be produced, or
/// while reading the response body.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The remote host could not be reached.
    #[error("connection error: {0}")]
    Connection(String),

    /// The transport gave up waiting.
    #[error("request timeout")]
    Timeout,

    /// The response body could not be read.
    #[error("body read failed: {0}")]
    Body(String),

    #[error("{0}")]
    Other(String),
}

/// A failed request paired with the response it produced.
///
/// For transport failures the response has status `0`, no headers and no
/// body, and `cause` holds the transport error.
#[derive(Debug)]
pub struct ResponseError {
    pub request: ResolvedRequest,
    pub response: Response,
    pub cause: Option<TransportError>,
}

impl ResponseError {
    pub fn new(request: ResolvedRequest, response: Response, cause: Option<TransportError>) -> Self {
        Self {
            request,
            response,
            cause,
        }
    }

    /// Status of the failed response; `0` for transport failures.
    pub fn status(&self) -> u16 {
        self.response.status()
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            Some(cause) => write!(
                f,
                "{} {} failed: {cause}",
                self.request.method, self.request.url
            ),
            None => write!(
                f,
                "{} {} failed with status {}",
                self.request.method,
                self.request.url,
                self.response.status()
            ),
        }
    }
}

impl std::error::Error for ResponseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}
