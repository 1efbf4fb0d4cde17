//! Minimal async HTTP client wrapper.
//!
//! # Overview
//! Verb methods (`get`, `post`, `put`, `patch`, `delete`) build a request
//! from a base URL, per-request options and default credentials, hand it to
//! a pluggable `Transport`, and route the response through a success or
//! error interceptor. The interceptors decide what the caller receives.
//!
//! # Design
//! - The transport is injected (or registered process-wide) so the core
//!   stays free of a specific HTTP stack; `UreqTransport` is bundled behind
//!   the `ureq` feature.
//! - Client configuration is immutable after `Client::new`.
//! - A response is classified as success for statuses `200..400`.
//!   Transport failures surface as status `0` to the error interceptor.
//! - Response bodies are parsed as JSON eagerly; reading `body()` after a
//!   failed parse logs a warning each time, `body_raw()` always has the text.

pub mod client;
pub mod error;
pub mod http;
pub mod interceptor;
pub mod request;
pub mod response;
pub mod transport;
pub mod url;
#[cfg(test)]
mod test_support;
#[cfg(feature = "ureq")]
pub mod ureq_transport;

pub use client::{Client, ClientConfig};
pub use error::{Error, ResponseError, TransportError};
pub use crate::http::{Credentials, Headers, HttpMethod};
pub use request::{GetOptions, RequestOptions, ResolvedRequest};
pub use response::Response;
pub use transport::{
    global_transport, set_global_transport, transport_fn, FetchOptions, RawResponse, Transport,
    TransportResponse,
};
pub use crate::url::build_url;
#[cfg(feature = "ureq")]
pub use ureq_transport::{install_default_transport, UreqTransport};
