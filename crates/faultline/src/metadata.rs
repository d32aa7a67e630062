//! Caller-supplied metadata and the CGI key-space merge.
//!
//! Two independently keyed sources (transport headers and CGI-like data) are
//! folded into a single flat map using the CGI environment-variable naming
//! convention (RFC 3875 style): hyphens become underscores, keys are
//! upper-cased, and header-derived keys get an `HTTP_` prefix.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Optional request context captured alongside an error.
///
/// All fields default to empty; absent metadata is always valid.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Arbitrary application context, copied verbatim into the payload.
    pub context: serde_json::Map<String, Value>,
    /// Session state, copied verbatim into the payload.
    pub session: serde_json::Map<String, Value>,
    /// Request parameters, copied verbatim into the payload.
    pub params: serde_json::Map<String, Value>,
    /// Request cookies, folded into `cgi_data` as `HTTP_COOKIE` unless the
    /// headers already supplied one.
    pub cookies: BTreeMap<String, String>,
    /// CGI-like environment data, merged into the canonical key space.
    pub cgi_data: BTreeMap<String, String>,
    /// Transport headers, merged into the canonical key space with an
    /// `HTTP_` prefix. Never appears as its own field in the payload.
    pub headers: BTreeMap<String, String>,
}

/// Merge CGI data and headers into one canonical flat map.
///
/// Headers are applied after cgi_data, so on a transformed-key collision the
/// header-derived entry wins. This precedence is deliberate and load-bearing.
pub fn merge_cgi_data(
    cgi_data: &BTreeMap<String, String>,
    headers: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut merged = BTreeMap::new();

    for (key, value) in cgi_data {
        merged.insert(transform_key(key), value.clone());
    }
    for (key, value) in headers {
        merged.insert(format!("HTTP_{}", transform_key(key)), value.clone());
    }

    merged
}

/// Canonical key transform: `server-software` -> `SERVER_SOFTWARE`.
fn transform_key(key: &str) -> String {
    key.replace('-', "_").to_ascii_uppercase()
}

/// Join cookies into a single `Cookie`-header-style value.
pub(crate) fn cookie_string(cookies: &BTreeMap<String, String>) -> String {
    cookies
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("; ")
}
