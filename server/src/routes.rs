use api::{
    ApiError, HistoryParams, HistoryQuery, HistoryRecordView, HttpResponse, PaginatedResponse,
    PostboxApi, RequestInput,
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

#[derive(Clone)]
pub struct AppState {
    pub api: PostboxApi,
}

impl AppState {
    pub fn new(api: PostboxApi) -> Self {
        Self { api }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/request",
            post(execute_request).fallback(method_not_allowed),
        )
        .route(
            "/api/history",
            get(query_history)
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        )
        .with_state(state)
}

async fn execute_request(
    State(state): State<AppState>,
    payload: Result<Json<RequestInput>, JsonRejection>,
) -> Result<Json<HttpResponse>, AppError> {
    let Json(input) = payload?;
    let response = state.api.execute_and_record(input).await?;
    Ok(Json(response))
}

async fn query_history(
    State(state): State<AppState>,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<PaginatedResponse<HistoryRecordView>>, AppError> {
    let Query(params) = params?;
    let page = state.api.query_history(&HistoryQuery::from(params)).await?;
    Ok(Json(page))
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

#[derive(Debug)]
pub enum AppError {
    Api(ApiError),
    InvalidBody(String),
    MethodNotAllowed,
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        AppError::Api(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                json!({ "error": "Method not allowed" }),
            ),
            AppError::InvalidBody(message) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid request body", "message": message }),
            ),
            AppError::Api(err) if err.is_contract_violation() => {
                (StatusCode::BAD_REQUEST, json!({ "error": err.to_string() }))
            }
            AppError::Api(err) => {
                tracing::error!(error = %err, "request handler failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error", "message": err.to_string() }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
