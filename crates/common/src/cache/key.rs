//! Canonical cache keys
//!
//! Two requests that differ only in JSON field order or query-param order
//! are the same request, and must hit the same cache entry and the same
//! in-flight slot. The key builder therefore serializes objects with sorted
//! keys itself instead of trusting `serde_json`'s map ordering, which can be
//! flipped to insertion order by the `preserve_order` feature anywhere in
//! the dependency graph.

use std::fmt;
use std::fmt::Write as _;

use serde_json::Value;

/// Deterministic identity of a request, usable as a cache and dedup key.
///
/// Built from the HTTP method, the fully resolved URL, the query params
/// (sorted), and the JSON body (canonicalized). The inner string keeps the
/// URL in clear text so substring invalidation by path fragment works.
///
/// # Example
/// ```
/// use fleetline_common::cache::CacheKey;
/// use serde_json::json;
///
/// let a = CacheKey::new("POST", "https://api/v1/trips", &[], Some(&json!({"a": 1, "b": 2})));
/// let b = CacheKey::new("POST", "https://api/v1/trips", &[], Some(&json!({"b": 2, "a": 1})));
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Compute the key for a request.
    ///
    /// `params` are key/value query parameters in whatever order the caller
    /// assembled them; they are sorted here. `body` is the JSON payload, if
    /// any.
    pub fn new(method: &str, url: &str, params: &[(String, String)], body: Option<&Value>) -> Self {
        let mut key = String::with_capacity(url.len() + 16);
        key.push_str(method);
        key.push(':');
        key.push_str(url);

        if !params.is_empty() {
            let mut sorted: Vec<&(String, String)> = params.iter().collect();
            sorted.sort();
            key.push('?');
            for (i, (name, value)) in sorted.iter().enumerate() {
                if i > 0 {
                    key.push('&');
                }
                key.push_str(name);
                key.push('=');
                key.push_str(value);
            }
        }

        if let Some(body) = body {
            key.push('|');
            write_canonical(body, &mut key);
        }

        Self(key)
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}

/// Serializes a JSON value with object keys in sorted order.
///
/// Scalars and strings defer to `Value`'s own JSON rendering (which handles
/// escaping); arrays keep their element order, since `[1,2]` and `[2,1]`
/// are different payloads.
fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // Render the key through Value to get correct JSON escaping.
                let _ = write!(out, "{}", Value::String((*key).clone()));
                out.push(':');
                if let Some(child) = map.get(*key) {
                    write_canonical(child, out);
                }
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => {
            let _ = write!(out, "{scalar}");
        }
    }
}
