use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{request::HttpRequest, response::HttpResponse};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// One executed request and its outcome, as stored in `request_history`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    pub id: String,
    pub method: String,
    pub url: String,
    /// JSON object of the request headers.
    pub headers: Option<String>,
    pub body: Option<String>,
    /// JSON object `{"headers": ..., "data": ...}` of the response.
    pub response: Option<String>,
    pub status_code: u16,
    pub response_time_ms: i64,
    pub timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HistoryRecord {
    pub fn from_transaction(
        request: &HttpRequest,
        response: &HttpResponse,
    ) -> Result<Self, serde_json::Error> {
        let headers = serde_json::to_string(&request.headers)?;
        let response_json = serde_json::to_string(&json!({
            "headers": response.headers,
            "data": response.data,
        }))?;
        let created_at = now_millis();
        Ok(HistoryRecord {
            id: Uuid::new_v4().to_string(),
            method: request.method.to_string(),
            url: request.url.clone(),
            headers: Some(headers),
            body: request.body.clone().filter(|body| !body.is_empty()),
            response: Some(response_json),
            status_code: response.status,
            response_time_ms: i64::try_from(response.response_time_ms).unwrap_or(i64::MAX),
            timestamp: response.timestamp,
            created_at,
            updated_at: created_at,
        })
    }
}

/// Current time truncated to what the store keeps (milliseconds).
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// History record as returned to the browser.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecordView {
    pub id: String,
    pub method: String,
    pub url: String,
    pub headers: Option<String>,
    pub body: Option<String>,
    pub response: Option<String>,
    pub status_code: u16,
    pub response_time: i64,
    pub timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<HistoryRecord> for HistoryRecordView {
    fn from(record: HistoryRecord) -> Self {
        Self {
            id: record.id,
            method: record.method,
            url: record.url,
            headers: record.headers,
            body: record.body,
            response: record.response,
            status_code: record.status_code,
            response_time: record.response_time_ms,
            timestamp: record.timestamp,
            created_at: record.created_at,
        }
    }
}

/// Optional filters, combined with AND. Empty strings mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    /// Case-sensitive substring of the url.
    pub search: Option<String>,
    /// Exact method name.
    pub method: Option<String>,
}

impl HistoryFilter {
    pub fn new(search: Option<String>, method: Option<String>) -> Self {
        Self {
            search: search.filter(|s| !s.is_empty()),
            method: method.filter(|m| !m.is_empty()),
        }
    }
}

/// Raw query-string parameters of the history endpoint.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct HistoryParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub method: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    /// 1-based.
    pub page: i64,
    pub limit: i64,
    pub filter: HistoryFilter,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            filter: HistoryFilter::default(),
        }
    }
}

impl HistoryQuery {
    pub fn new(page: i64, limit: i64, filter: HistoryFilter) -> Self {
        Self {
            page,
            limit,
            filter,
        }
    }

    /// Saturates on overflow. Sign checks belong to the store.
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

impl From<HistoryParams> for HistoryQuery {
    fn from(params: HistoryParams) -> Self {
        HistoryQuery {
            page: lenient_int(params.page.as_deref()).unwrap_or(DEFAULT_PAGE),
            limit: lenient_int(params.limit.as_deref()).unwrap_or(DEFAULT_LIMIT),
            filter: HistoryFilter::new(params.search, params.method),
        }
    }
}

/// Reads the leading integer of `raw`, e.g. `"12abc"` is 12.
/// Missing, non-numeric and zero values all yield `None`.
pub fn lenient_int(raw: Option<&str>) -> Option<i64> {
    let trimmed = raw?.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value = digits[..end].parse::<i64>().ok()?;
    Some(sign * value).filter(|v| *v != 0)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: i64, page: i64, limit: i64) -> Self {
        let total_pages = if limit > 0 {
            total / limit + i64::from(total % limit != 0)
        } else {
            0
        };
        Self {
            data,
            total,
            page,
            limit,
            total_pages,
        }
    }
}
