use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{
  sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow},
  QueryBuilder, Row, Sqlite,
};

use crate::{
  config::ApiConfig,
  domain::history::{HistoryFilter, HistoryQuery, HistoryRecord},
  error::{ApiError, Result},
};

const HISTORY_COLUMNS: &str = "id, method, url, headers, body, status_code, response, \
  response_time, timestamp, created_at, updated_at";

/// Handle to the history database. Cloning shares the underlying pool.
#[derive(Clone, Debug)]
pub struct HistoryDb {
  pool: SqlitePool,
}

impl HistoryDb {
  pub async fn connect(config: &ApiConfig) -> Result<Self> {
    tracing::info!(url = %config.database_url, "opening history database");
    let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
      .max_connections(config.effective_max_connections())
      // an in-memory database disappears with its last connection
      .idle_timeout(None)
      .max_lifetime(None)
      .connect_with(options)
      .await?;
    Self::from_pool(pool).await
  }

  pub async fn in_memory() -> Result<Self> {
    Self::connect(&ApiConfig {
      database_url: "sqlite::memory:".into(),
      ..ApiConfig::default()
    })
    .await
  }

  /// Wraps an existing pool and brings its schema up to date.
  pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(HistoryDb { pool })
  }

  pub async fn close(&self) {
    self.pool.close().await;
    tracing::info!("history database closed");
  }

  pub fn is_closed(&self) -> bool {
    self.pool.is_closed()
  }

  pub async fn save_request_history(&self, record: &HistoryRecord) -> Result<()> {
    tracing::debug!(id = %record.id, url = %record.url, "saving request history");
    let mut transaction = self.pool.begin().await?;
    sqlx::query(
      r#"
            INSERT INTO request_history (id, method, url, headers, body, status_code, response,
              response_time, timestamp, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
    )
    .bind(&record.id)
    .bind(&record.method)
    .bind(&record.url)
    .bind(&record.headers)
    .bind(&record.body)
    .bind(record.status_code)
    .bind(&record.response)
    .bind(record.response_time_ms)
    .bind(format_instant(&record.timestamp))
    .bind(format_instant(&record.created_at))
    .bind(format_instant(&record.updated_at))
    .execute(&mut *transaction)
    .await?;
    transaction.commit().await?;
    Ok(())
  }

  /// Returns one page of matching records, newest first, plus the number of
  /// records matching the filter across all pages.
  pub async fn find_request_history(
    &self,
    query: &HistoryQuery,
  ) -> Result<(Vec<HistoryRecord>, i64)> {
    if query.limit <= 0 {
      return Err(ApiError::InvalidArgument(format!(
        "limit must be a positive integer, got {}",
        query.limit
      )));
    }
    if query.page <= 0 {
      return Err(ApiError::InvalidArgument(format!(
        "page must be a positive integer, got {}",
        query.page
      )));
    }
    let filter = &query.filter;

    // count and page come from the same snapshot
    let mut transaction = self.pool.begin().await?;

    let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM request_history");
    push_filter(&mut count_query, filter);
    let total: i64 = count_query
      .build()
      .fetch_one(&mut *transaction)
      .await?
      .try_get(0)?;

    let mut page_query =
      QueryBuilder::<Sqlite>::new(format!("SELECT {HISTORY_COLUMNS} FROM request_history"));
    push_filter(&mut page_query, filter);
    page_query
      .push(" ORDER BY created_at DESC, rowid DESC LIMIT ")
      .push_bind(query.limit)
      .push(" OFFSET ")
      .push_bind(query.offset());
    let rows = page_query.build().fetch_all(&mut *transaction).await?;
    transaction.commit().await?;

    let records = rows
      .iter()
      .map(history_record_from_row)
      .collect::<Result<Vec<_>>>()?;
    Ok((records, total))
  }

  pub async fn get_request_history(&self, id: &str) -> Result<Option<HistoryRecord>> {
    let row = sqlx::query(&format!(
      "SELECT {HISTORY_COLUMNS} FROM request_history WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;
    row.as_ref().map(history_record_from_row).transpose()
  }
}

/// `instr` keeps the url search case-sensitive and treats `%`/`_` literally,
/// which `LIKE` would not.
fn push_filter(query: &mut QueryBuilder<'_, Sqlite>, filter: &HistoryFilter) {
  let mut separator = " WHERE ";
  if let Some(search) = &filter.search {
    query
      .push(separator)
      .push("instr(url, ")
      .push_bind(search.clone())
      .push(") > 0");
    separator = " AND ";
  }
  if let Some(method) = &filter.method {
    query.push(separator).push("method = ").push_bind(method.clone());
  }
}

fn history_record_from_row(row: &SqliteRow) -> Result<HistoryRecord> {
  let id: String = row.try_get("id")?;
  let timestamp: String = row.try_get("timestamp")?;
  let created_at: String = row.try_get("created_at")?;
  let updated_at: String = row.try_get("updated_at")?;
  Ok(HistoryRecord {
    method: row.try_get("method")?,
    url: row.try_get("url")?,
    headers: row.try_get("headers")?,
    body: row.try_get("body")?,
    response: row.try_get("response")?,
    status_code: row.try_get("status_code")?,
    response_time_ms: row.try_get("response_time")?,
    timestamp: parse_instant(&id, &timestamp)?,
    created_at: parse_instant(&id, &created_at)?,
    updated_at: parse_instant(&id, &updated_at)?,
    id,
  })
}

/// Fixed-width so that text order is chronological order.
fn format_instant(instant: &DateTime<Utc>) -> String {
  instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_instant(id: &str, raw: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(raw)
    .map(|instant| instant.with_timezone(&Utc))
    .map_err(|e| ApiError::CorruptRecord(format!("record {id} has bad instant {raw:?}: {e}")))
}
