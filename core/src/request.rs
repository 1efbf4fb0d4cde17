//! Request options and the normalization step that turns them into a
//! `ResolvedRequest`.
//!
//! # Design
//! Normalization is synchronous and does no I/O. The structured body stays
//! a `serde_json::Value` on the resolved request and is only encoded by the
//! transport invoker, so a request interceptor can still rewrite it.

use serde::Serialize;
use serde_json::Value;

use crate::error::Error;
use crate::http::{Credentials, Headers, HttpMethod};
use crate::url::{build_url, QueryParams};

const CONTENT_TYPE: &str = "Content-Type";
const APPLICATION_JSON: &str = "application/json";

/// Per-request options for bodied verbs (POST, PUT, PATCH, DELETE).
///
/// Header and query entries with a `None` value are dropped before the
/// request leaves the client. When both `body` and `body_raw` are set, the
/// JSON-encoded `body` is what gets sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub search_params: QueryParams,
    pub headers: Vec<(String, Option<String>)>,
    pub body: Option<Value>,
    pub body_raw: Option<String>,
    pub credentials: Option<Credentials>,
}

/// Query, header and credentials setters shared by both option types.
macro_rules! common_options {
    ($options:ty) => {
        impl $options {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn search_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
                self.search_params.push((key.into(), Some(value.into())));
                self
            }

            pub fn search_param_opt(mut self, key: impl Into<String>, value: Option<String>) -> Self {
                self.search_params.push((key.into(), value));
                self
            }

            pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
                self.headers.push((name.into(), Some(value.into())));
                self
            }

            pub fn header_opt(mut self, name: impl Into<String>, value: Option<String>) -> Self {
                self.headers.push((name.into(), value));
                self
            }

            pub fn credentials(mut self, credentials: Credentials) -> Self {
                self.credentials = Some(credentials);
                self
            }
        }
    };
}

common_options!(RequestOptions);
common_options!(GetOptions);

impl RequestOptions {
    /// Set the structured body from an already-built JSON value.
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set the structured body by serializing `payload`.
    pub fn json<T: Serialize + ?Sized>(mut self, payload: &T) -> Result<Self, Error> {
        self.body = Some(serde_json::to_value(payload)?);
        Ok(self)
    }

    /// Set a pre-serialized body, sent as-is.
    pub fn body_raw(mut self, body: impl Into<String>) -> Self {
        self.body_raw = Some(body.into());
        self
    }
}

/// Per-request options for GET, which carries no body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetOptions {
    pub search_params: QueryParams,
    pub headers: Vec<(String, Option<String>)>,
    pub credentials: Option<Credentials>,
}

impl From<GetOptions> for RequestOptions {
    fn from(options: GetOptions) -> Self {
        Self {
            search_params: options.search_params,
            headers: options.headers,
            body: None,
            body_raw: None,
            credentials: options.credentials,
        }
    }
}

/// A request after URL construction and default merging. This is what the
/// request interceptor sees and may rewrite before the transport runs.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Headers,
    pub body: Option<Value>,
    pub body_raw: Option<String>,
    pub credentials: Option<Credentials>,
}

impl ResolvedRequest {
    /// Resolve `options` for `method` and `path` against the client's base
    /// URL and default credentials.
    pub fn resolve(
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
        base_url: Option<&str>,
        default_credentials: Option<Credentials>,
    ) -> Self {
        let url = build_url(base_url, path, Some(options.search_params.as_slice()));
        let headers = normalize_headers(options.headers, options.body.is_some());

        Self {
            method,
            url,
            headers,
            body: options.body,
            body_raw: options.body_raw,
            credentials: options.credentials.or(default_credentials),
        }
    }
}

/// Add `Content-Type: application/json` for structured bodies unless the
/// caller set one, then drop every header without a value.
fn normalize_headers(headers: Vec<(String, Option<String>)>, has_json_body: bool) -> Headers {
    let explicit_content_type = headers
        .iter()
        .any(|(name, value)| value.is_some() && name.eq_ignore_ascii_case(CONTENT_TYPE));

    let mut normalized: Headers = headers
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| (name, value)))
        .collect();

    if has_json_body && !explicit_content_type {
        normalized.push((CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()));
    }
    normalized
}
