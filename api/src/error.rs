use std::time::Duration;

/// Errors surfaced by the request pipeline and the history store.
///
/// Remote failures are not part of this type: the executor folds them into an
/// [`HttpResponse`](crate::domain::response::HttpResponse) instead.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("Method and URL are required")]
    MissingField,

    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Corrupt history record: {0}")]
    CorruptRecord(String),
}

impl ApiError {
    /// True for errors caused by the caller's input rather than by this system.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            ApiError::MissingField | ApiError::UnsupportedMethod(_) | ApiError::InvalidArgument(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Why an outbound call produced no HTTP response.
///
/// The `Display` text ends up in the `data.error` field of the normalized
/// response, so it is worded for the person looking at the request tester.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    #[error("timeout of {}ms exceeded", .0.as_millis())]
    Timeout(Duration),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unsupported protocol: {0}")]
    UnsupportedProtocol(String),

    #[error("Invalid request: {0}")]
    BuildError(String),

    #[error("{0}")]
    NetworkError(String),
}

impl RequestError {
    /// Classifies a client error. `timeout` is the configured bound, used for the message.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            RequestError::Timeout(timeout)
        } else if err.is_builder() {
            RequestError::BuildError(err.to_string())
        } else {
            RequestError::NetworkError(err.to_string())
        }
    }
}

impl From<url::ParseError> for RequestError {
    fn from(err: url::ParseError) -> Self {
        RequestError::InvalidUrl(err.to_string())
    }
}
