//! Response record and the resolver that routes it to an interceptor.
//!
//! # Design
//! The body is parsed as JSON once, when the record is built. A failed
//! parse (or a failed body read) sets `decode_failed`; every later call to
//! `body()` logs a warning and returns `None`. `body_raw()` never warns.
//! Success vs. error is decided on status alone, regardless of whether the
//! body decoded.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, ResponseError};
use crate::http::{collapse_headers, find_header, Headers};
use crate::interceptor::{ErrorInterceptor, SuccessInterceptor};
use crate::request::ResolvedRequest;
use crate::transport::TransportResponse;

/// One response, built fresh for each request.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: u16,
    headers: Headers,
    body_raw: Option<String>,
    body: Option<Value>,
    decode_failed: bool,
}

impl Response {
    /// Build a record from status, header pairs and the body text (`None`
    /// when the body could not be read). Repeated headers collapse to the
    /// last value.
    pub fn new(status: u16, headers: Headers, body_raw: Option<String>) -> Self {
        let (body, decode_failed) = match body_raw.as_deref().map(serde_json::from_str::<Value>) {
            Some(Ok(value)) => (Some(value), false),
            Some(Err(e)) => {
                tracing::debug!(status, error = %e, "response body is not JSON");
                (None, true)
            }
            None => (None, true),
        };

        Self {
            status,
            headers: collapse_headers(headers),
            body_raw,
            body,
            decode_failed,
        }
    }

    /// The synthetic record used when the transport itself failed.
    pub fn transport_failure() -> Self {
        Self {
            status: 0,
            headers: Vec::new(),
            body_raw: None,
            body: None,
            decode_failed: false,
        }
    }

    /// Read the body of a transport response and build the record.
    pub async fn read(raw: Box<dyn TransportResponse>) -> Self {
        let status = raw.status();
        let headers = raw.headers();
        let body_raw = match raw.text().await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::debug!(status, error = %e, "failed to read response body");
                None
            }
        };
        Self::new(status, headers, body_raw)
    }

    /// HTTP status; `0` means the transport failed.
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..400).contains(&self.status)
    }

    /// Headers with lowercased, unique names.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// The body text as received.
    pub fn body_raw(&self) -> Option<&str> {
        self.body_raw.as_deref()
    }

    /// The decoded JSON body. Warns on every call if the body was not JSON.
    pub fn body(&self) -> Option<&Value> {
        if self.decode_failed {
            tracing::warn!(
                status = self.status,
                "response body is not valid JSON; use body_raw() for the text"
            );
        }
        self.body.as_ref()
    }

    /// Decode the JSON body into `T`. An absent body decodes as `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let value = self.body().cloned().unwrap_or(Value::Null);
        serde_json::from_value(value).map_err(Error::Deserialization)
    }

    /// Whether the body failed to read or parse.
    pub fn decode_failed(&self) -> bool {
        self.decode_failed
    }
}

/// Read `raw` and hand the result to the success or error interceptor.
/// Whatever the interceptor returns is the result of the call.
pub(crate) async fn resolve(
    request: ResolvedRequest,
    raw: Box<dyn TransportResponse>,
    on_success: &SuccessInterceptor,
    on_error: &ErrorInterceptor,
) -> Result<Response, Error> {
    let response = Response::read(raw).await;
    if response.is_success() {
        on_success(request, response).await
    } else {
        on_error(ResponseError::new(request, response, None)).await
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;
    use tracing::Level;

    use super::*;
    use crate::error::TransportError;
    use crate::test_support::EventCounter;
    use crate::transport::RawResponse;

    #[test]
    fn parsed_body_is_stable_and_silent() {
        let response = Response::new(200, Vec::new(), Some(r#"{"id":1}"#.to_string()));
        let warnings = EventCounter::new(Level::WARN);
        warnings.watch(|| {
            assert_eq!(response.body(), Some(&json!({"id": 1})));
            assert_eq!(response.body(), Some(&json!({"id": 1})));
        });
        assert_eq!(warnings.count(), 0);
    }

    #[test]
    fn invalid_json_warns_on_every_access() {
        let response = Response::new(200, Vec::new(), Some("not json".to_string()));
        let warnings = EventCounter::new(Level::WARN);
        warnings.watch(|| {
            assert_eq!(response.body(), None);
            assert_eq!(response.body(), None);
            assert_eq!(response.body_raw(), Some("not json"));
        });
        assert_eq!(warnings.count(), 2);
        assert!(response.decode_failed());
    }

    #[test]
    fn unreadable_body_is_absent_and_warns() {
        let response = Response::new(500, Vec::new(), None);
        let warnings = EventCounter::new(Level::WARN);
        warnings.watch(|| {
            assert_eq!(response.body_raw(), None);
            assert_eq!(response.body(), None);
        });
        assert_eq!(warnings.count(), 1);
    }

    #[test]
    fn transport_failure_record_is_empty() {
        let response = Response::transport_failure();
        assert_eq!(response.status(), 0);
        assert!(!response.is_success());
        assert!(response.headers().is_empty());
        assert_eq!(response.body_raw(), None);
        assert_eq!(response.body(), None);
    }

    #[test]
    fn success_range_is_200_to_399() {
        let status = |code| Response::new(code, Vec::new(), None).is_success();
        assert!(!status(199));
        assert!(status(200));
        assert!(status(304));
        assert!(status(399));
        assert!(!status(400));
        assert!(!status(500));
    }

    #[test]
    fn headers_collapse_last_wins() {
        let headers = vec![
            ("X-A".to_string(), "1".to_string()),
            ("x-a".to_string(), "2".to_string()),
        ];
        let response = Response::new(200, headers, Some("{}".to_string()));
        assert_eq!(response.header("X-A"), Some("2"));
        assert_eq!(response.headers().len(), 1);
    }

    #[test]
    fn json_decodes_typed_body() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct ErrorBody {
            error: String,
        }
        let response = Response::new(400, Vec::new(), Some(r#"{"error":"email_invalid"}"#.to_string()));
        let body: ErrorBody = response.json().unwrap();
        assert_eq!(body.error, "email_invalid");

        let missing: Option<ErrorBody> = Response::new(200, Vec::new(), Some("null".to_string()))
            .json()
            .unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn json_shape_mismatch_is_a_deserialization_error() {
        let response = Response::new(200, Vec::new(), Some(r#"{"id":"not a number"}"#.to_string()));

        #[derive(Debug, Deserialize)]
        struct Record {
            #[allow(dead_code)]
            id: u64,
        }
        let err = response.json::<Record>().unwrap_err();
        assert!(matches!(err, Error::Deserialization(_)));
        assert!(err.to_string().starts_with("deserialization failed"));
    }

    #[tokio::test]
    async fn read_keeps_status_when_body_read_fails() {
        let raw = RawResponse::unreadable(502, TransportError::Body("reset".to_string()));
        let response = Response::read(Box::new(raw)).await;
        assert_eq!(response.status(), 502);
        assert_eq!(response.body_raw(), None);
        assert!(response.decode_failed());
    }
}
