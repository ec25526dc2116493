pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod executor;
pub mod history;
pub mod recorder;
pub mod utilities;

use std::time::Duration;

pub use config::ApiConfig;
pub use db::HistoryDb;
pub use domain::{
    history::{HistoryParams, HistoryQuery, HistoryRecordView, PaginatedResponse},
    request::{HttpMethod, HttpRequest, RequestInput},
    response::HttpResponse,
};
pub use error::{ApiError, Result};

use executor::RequestExecutor;
use history::HistoryService;
use recorder::TransactionRecorder;

/// Entry point for the two operations the UI calls: execute-and-record and
/// history queries. All services share one store handle.
#[derive(Clone, Debug)]
pub struct PostboxApi {
    executor: RequestExecutor,
    recorder: TransactionRecorder,
    history: HistoryService,
    db: HistoryDb,
}

impl PostboxApi {
    /// Opens the store described by `config` and builds the outbound client.
    pub async fn open(config: &ApiConfig) -> Result<Self> {
        let db = HistoryDb::connect(config).await?;
        Self::with_db(db, config.request_timeout)
    }

    pub fn with_db(db: HistoryDb, request_timeout: Duration) -> Result<Self> {
        Ok(PostboxApi {
            executor: RequestExecutor::new(request_timeout)?,
            recorder: TransactionRecorder::new(db.clone()),
            history: HistoryService::new(db.clone()),
            db,
        })
    }

    /// Executes the request and records it. Only a malformed `input` is an
    /// error; remote failures are part of the returned response and a failed
    /// history write is only logged.
    pub async fn execute_and_record(&self, input: RequestInput) -> Result<HttpResponse> {
        let request = HttpRequest::try_from(input).inspect_err(|e| {
            tracing::warn!(error = %e, "rejected request");
        })?;
        let response = self.executor.execute(&request).await;
        self.recorder.record(&request, &response).await;
        Ok(response)
    }

    pub async fn query_history(
        &self,
        query: &HistoryQuery,
    ) -> Result<PaginatedResponse<HistoryRecordView>> {
        self.history.query(query).await
    }

    pub async fn close(&self) {
        self.db.close().await;
    }
}
