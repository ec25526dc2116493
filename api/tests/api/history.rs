use std::collections::HashSet;

use chrono::{Duration, TimeZone, Utc};
use postbox_api::{
    domain::history::{HistoryFilter, HistoryRecord},
    ApiError, HistoryParams, HistoryQuery, PostboxApi,
};

use crate::helpers::{history_record, initialize_test_db, seed};

/// Builds an api over a store seeded with `records`.
async fn api_with(records: &[HistoryRecord]) -> PostboxApi {
    let db = initialize_test_db().await;
    seed(&db, records).await;
    PostboxApi::with_db(db, std::time::Duration::from_secs(5)).unwrap()
}

/// 15 records, one second apart: 3 POSTs to a users url, plus decoys that
/// match only one of the two filters.
fn fifteen_records() -> Vec<HistoryRecord> {
    let base = Utc.with_ymd_and_hms(2025, 9, 19, 8, 0, 0).unwrap();
    (0..15)
        .map(|i| {
            let (method, url) = match i {
                2 | 7 | 11 => ("POST", format!("https://api.example.com/users/{i}")),
                3 | 8 => ("POST", format!("https://api.example.com/orders/{i}")),
                4 | 9 => ("GET", format!("https://api.example.com/users/{i}")),
                _ => ("GET", format!("https://api.example.com/health/{i}")),
            };
            history_record(method, &url, base + Duration::seconds(i))
        })
        .collect()
}

#[tokio::test]
async fn filters_combine_with_and() {
    let api = api_with(&fifteen_records()).await;
    let query = HistoryQuery::new(
        1,
        10,
        HistoryFilter::new(Some("users".into()), Some("POST".into())),
    );

    let result = api.query_history(&query).await.unwrap();

    assert_eq!(result.total, 3);
    assert_eq!(result.page, 1);
    assert_eq!(result.limit, 10);
    assert_eq!(result.total_pages, 1);
    assert_eq!(result.data.len(), 3);
    for record in &result.data {
        assert_eq!(record.method, "POST");
        assert!(record.url.contains("users"));
    }
    let urls: Vec<_> = result.data.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://api.example.com/users/11",
            "https://api.example.com/users/7",
            "https://api.example.com/users/2",
        ]
    );
}

#[tokio::test]
async fn pages_concatenate_to_the_full_ordered_set() {
    let records = fifteen_records();
    let api = api_with(&records).await;
    let limit = 4;

    let first = api
        .query_history(&HistoryQuery::new(1, limit, HistoryFilter::default()))
        .await
        .unwrap();
    assert_eq!(first.total, 15);
    assert_eq!(first.total_pages, 4);

    let mut seen = Vec::new();
    for page in 1..=first.total_pages {
        let result = api
            .query_history(&HistoryQuery::new(page, limit, HistoryFilter::default()))
            .await
            .unwrap();
        assert!(result.data.len() as i64 <= limit);
        assert_eq!(result.total, 15);
        seen.extend(result.data);
    }

    assert_eq!(seen.len(), 15);
    let ids: HashSet<_> = seen.iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids.len(), 15);
    assert!(seen.windows(2).all(|pair| pair[0].created_at >= pair[1].created_at));
    assert_eq!(seen.first().unwrap().id, records.last().unwrap().id);
}

#[tokio::test]
async fn repeated_queries_are_identical() {
    let api = api_with(&fifteen_records()).await;
    let query = HistoryQuery::new(2, 3, HistoryFilter::new(Some("api".into()), None));

    let once = api.query_history(&query).await.unwrap();
    let twice = api.query_history(&query).await.unwrap();

    assert_eq!(once, twice);
}

#[tokio::test]
async fn raw_params_use_defaults() {
    let api = api_with(&fifteen_records()).await;
    let params = HistoryParams {
        page: Some("nope".into()),
        limit: None,
        search: Some(String::new()),
        method: Some(String::new()),
    };

    let result = api.query_history(&HistoryQuery::from(params)).await.unwrap();

    assert_eq!(result.page, 1);
    assert_eq!(result.limit, 10);
    assert_eq!(result.total, 15);
    assert_eq!(result.total_pages, 2);
    assert_eq!(result.data.len(), 10);
}

#[tokio::test]
async fn empty_store_has_no_pages() {
    let api = api_with(&[]).await;
    let result = api.query_history(&HistoryQuery::default()).await.unwrap();
    assert!(result.data.is_empty());
    assert_eq!(result.total, 0);
    assert_eq!(result.total_pages, 0);
}

#[tokio::test]
async fn negative_limit_is_a_contract_violation() {
    let api = api_with(&fifteen_records()).await;
    let params = HistoryParams {
        limit: Some("-5".into()),
        ..HistoryParams::default()
    };
    let err = api.query_history(&HistoryQuery::from(params)).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument(_)));
}

#[tokio::test]
async fn huge_limit_fits_on_one_page() {
    let api = api_with(&fifteen_records()).await;
    let params = HistoryParams {
        limit: Some(i64::MAX.to_string()),
        ..HistoryParams::default()
    };

    let result = api.query_history(&HistoryQuery::from(params)).await.unwrap();

    assert_eq!(result.limit, i64::MAX);
    assert_eq!(result.total, 15);
    assert_eq!(result.total_pages, 1);
    assert_eq!(result.data.len(), 15);
}
