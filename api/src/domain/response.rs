use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::RequestError;

/// Status code reported when no HTTP response was received at all.
pub const FAILED_STATUS: u16 = 0;
pub const FAILED_STATUS_TEXT: &str = "Request Failed";

/// Outcome of an outbound call. Transport failures and remote errors share
/// this shape; a transport failure has `status == FAILED_STATUS`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: BTreeMap<String, String>,
    pub data: Value,
    #[serde(rename = "responseTime")]
    pub response_time_ms: u64,
    /// When the call completed.
    pub timestamp: DateTime<Utc>,
}

impl HttpResponse {
    pub fn failed(error: &RequestError, response_time_ms: u64, timestamp: DateTime<Utc>) -> Self {
        Self {
            status: FAILED_STATUS,
            status_text: FAILED_STATUS_TEXT.to_string(),
            headers: BTreeMap::new(),
            data: json!({ "error": error.to_string() }),
            response_time_ms,
            timestamp,
        }
    }

    pub fn is_transport_failure(&self) -> bool {
        self.status == FAILED_STATUS
    }

    /// The error message carried in `data`, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.data.get("error").and_then(Value::as_str)
    }
}
