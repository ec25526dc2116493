use crate::{
    db::HistoryDb,
    domain::history::{HistoryQuery, HistoryRecordView, PaginatedResponse},
    error::Result,
};

/// Read side of the request history: filtering, paging and shaping for display.
#[derive(Clone, Debug)]
pub struct HistoryService {
    db: HistoryDb,
}

impl HistoryService {
    pub fn new(db: HistoryDb) -> Self {
        Self { db }
    }

    pub async fn query(&self, query: &HistoryQuery) -> Result<PaginatedResponse<HistoryRecordView>> {
        let (records, total) = self.db.find_request_history(query).await?;
        tracing::debug!(
            page = query.page,
            limit = query.limit,
            search = ?query.filter.search,
            method = ?query.filter.method,
            total,
            "history queried"
        );
        let data = records.into_iter().map(HistoryRecordView::from).collect();
        Ok(PaginatedResponse::new(data, total, query.page, query.limit))
    }
}
