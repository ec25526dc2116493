use std::time::Duration;

use chrono::{DateTime, Utc};
use postbox_api::{
    domain::history::HistoryRecord, HistoryDb, HistoryQuery, HistoryRecordView, PaginatedResponse,
    PostboxApi,
};
use uuid::Uuid;
use wiremock::MockServer;

pub struct TestApp {
    pub app: PostboxApi,
    pub test_server: MockServer,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.test_server.uri(), path)
    }

    pub async fn history(&self) -> PaginatedResponse<HistoryRecordView> {
        self
            .app
            .query_history(&HistoryQuery::default())
            .await
            .expect("history query failed")
    }
}

pub async fn spawn_test_app() -> TestApp {
    spawn_test_app_with_timeout(Duration::from_secs(5)).await
}

pub async fn spawn_test_app_with_timeout(timeout: Duration) -> TestApp {
    let db = initialize_test_db().await;
    TestApp {
        app: PostboxApi::with_db(db, timeout).expect("could not build api"),
        test_server: MockServer::start().await,
    }
}

pub async fn initialize_test_db() -> HistoryDb {
    HistoryDb::in_memory()
        .await
        .expect("could not open in-memory database")
}

/// A local address that nothing listens on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("could not bind");
    let port = listener.local_addr().expect("no local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}/unreachable")
}

pub fn history_record(method: &str, url: &str, created_at: DateTime<Utc>) -> HistoryRecord {
    HistoryRecord {
        id: Uuid::new_v4().to_string(),
        method: method.to_string(),
        url: url.to_string(),
        headers: Some("{}".to_string()),
        body: None,
        response: Some(r#"{"headers":{},"data":""}"#.to_string()),
        status_code: 200,
        response_time_ms: 10,
        timestamp: created_at,
        created_at,
        updated_at: created_at,
    }
}

pub async fn seed(db: &HistoryDb, records: &[HistoryRecord]) {
    for record in records {
        db.save_request_history(record)
            .await
            .expect("could not seed history");
    }
}
