use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{header::HeaderMap, StatusCode};
use serde_json::{json, Value};

/// Turns a raw response body into the `data` payload shown to the user.
///
/// JSON bodies come back structured and anything else as text. Bodies that
/// are not UTF-8 are wrapped as base64. An empty body on a non-2xx status
/// becomes an error object, since there is nothing else to show.
pub fn build_response_data(status: StatusCode, body: &[u8]) -> Value {
    if body.is_empty() && !status.is_success() {
        return json!({ "error": format!("Request failed with status code {}", status.as_u16()) });
    }
    match std::str::from_utf8(body) {
        Ok(text) => serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())),
        Err(_) => json!({ "encoding": "base64", "content": STANDARD.encode(body) }),
    }
}

pub fn status_text(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("Unknown").to_string()
}

/// Flattens response headers. Names are already lower-case; repeated
/// headers are joined with ", ".
pub fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut collected: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        collected
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    collected
}
