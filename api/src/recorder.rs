use crate::{
    db::HistoryDb,
    domain::{history::HistoryRecord, request::HttpRequest, response::HttpResponse},
    error::Result,
};

/// Writes one history record per executed request.
///
/// Recording is best-effort: a failed write is logged and otherwise ignored,
/// so the caller's response never depends on the store being available.
#[derive(Clone, Debug)]
pub struct TransactionRecorder {
    db: HistoryDb,
}

impl TransactionRecorder {
    pub fn new(db: HistoryDb) -> Self {
        Self { db }
    }

    pub async fn record(&self, request: &HttpRequest, response: &HttpResponse) {
        match self.try_record(request, response).await {
            Ok(record) => tracing::debug!(id = %record.id, "request history saved"),
            Err(e) => tracing::error!(
                method = %request.method,
                url = %request.url,
                error = %e,
                "failed to save request history"
            ),
        }
    }

    pub async fn try_record(
        &self,
        request: &HttpRequest,
        response: &HttpResponse,
    ) -> Result<HistoryRecord> {
        let record = HistoryRecord::from_transaction(request, response)?;
        self.db.save_request_history(&record).await?;
        Ok(record)
    }
}
