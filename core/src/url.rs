//! URL construction: base URL + path + query string.
//!
//! # Design
//! Pure string work. The base is not parsed as a `url::Url` because it may
//! be relative (`/api`) or absent, and the join rule only cares about the
//! slash at the seam. Query encoding uses `application/x-www-form-urlencoded`
//! rules via `url::form_urlencoded`, the same encoding browsers apply to
//! search params.

use url::form_urlencoded;

/// Query parameters in insertion order. `None` values are dropped before
/// encoding.
pub type QueryParams = Vec<(String, Option<String>)>;

/// Build the final request URL.
///
/// Absolute `http://` / `https://` paths ignore `base` entirely. Otherwise
/// `base` and `path` are joined with exactly one `/` at the seam. Present
/// query parameters are appended as `?k=v&...` in insertion order.
pub fn build_url(base: Option<&str>, path: &str, params: Option<&[(String, Option<String>)]>) -> String {
    let mut url = if is_absolute(path) {
        path.to_string()
    } else {
        join(base.unwrap_or(""), path)
    };

    let query = encode_query(params.unwrap_or(&[]));
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }
    url
}

/// Whether `path` already names a full `http(s)` URL.
pub fn is_absolute(path: &str) -> bool {
    has_prefix_ignore_case(path, "http://") || has_prefix_ignore_case(path, "https://")
}

/// Encode present pairs as a query string, without the leading `?`.
pub fn encode_query(params: &[(String, Option<String>)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        if let Some(value) = value {
            serializer.append_pair(key, value);
        }
    }
    serializer.finish()
}

fn join(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{base}{}", &path[1..]),
        (false, false) if !base.is_empty() => format!("{base}/{path}"),
        _ => format!("{base}{path}"),
    }
}

fn has_prefix_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.is_char_boundary(prefix.len())
        && s[..prefix.len()].eq_ignore_ascii_case(prefix)
}
