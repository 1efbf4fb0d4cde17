//! Plain-data HTTP vocabulary shared by the request and response halves.
//!
//! # Design
//! Headers are kept as ordered `(name, value)` pairs rather than a map so
//! the order the caller wrote them in is the order the transport sees.
//! Lookups are case-insensitive, matching how HTTP treats header names.

use std::fmt;

use serde::{Deserialize, Serialize};

/// HTTP method for a request. Only the five verbs the client exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credentials policy forwarded to the transport.
///
/// Browser-style transports use it to decide whether cookies travel with
/// the request. Native transports are free to ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Credentials {
    Omit,
    SameOrigin,
    Include,
}

impl Credentials {
    pub fn as_str(&self) -> &'static str {
        match self {
            Credentials::Omit => "omit",
            Credentials::SameOrigin => "same-origin",
            Credentials::Include => "include",
        }
    }
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered header pairs with concrete values.
pub type Headers = Vec<(String, String)>;

/// Case-insensitive lookup of the first header named `name`.
pub fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Collapse repeated header names so each name appears once with the last
/// value seen. Names are lowercased; first-seen position is preserved.
pub fn collapse_headers<I>(pairs: I) -> Headers
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut collapsed: Headers = Vec::new();
    for (name, value) in pairs {
        let name = name.to_ascii_lowercase();
        match collapsed.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => collapsed.push((name, value)),
        }
    }
    collapsed
}
