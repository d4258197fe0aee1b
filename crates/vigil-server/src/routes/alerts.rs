//! Alert routes under `/api/alerts`.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use vigil_alert_types::{Alert, AlertFilter, Finding, Statistics};

/// Create the alerts router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_alerts).post(create_alert))
        .route("/stats/summary", get(statistics))
        .route("/:id", get(get_alert).delete(delete_alert))
        .route("/:id/status", put(update_status))
}

/// Query string for listing alerts. Empty values count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct AlertListParams {
    pub severity: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
}

/// Body of a status update.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: Option<String>,
}

/// Parse an optional query value, treating an empty string as absent.
pub(crate) fn parse_param<T: FromStr>(name: &str, raw: Option<&str>) -> ApiResult<Option<T>> {
    match raw.filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| {
            ApiError::InvalidQueryParam(format!("unknown {} '{}'", name, value))
        }),
    }
}

impl AlertListParams {
    fn to_filter(&self) -> ApiResult<AlertFilter> {
        Ok(AlertFilter {
            severity: parse_param("severity", self.severity.as_deref())?,
            status: parse_param("status", self.status.as_deref())?,
            category: parse_param("category", self.category.as_deref())?,
        })
    }
}

async fn list_alerts(
    State(state): State<AppState>,
    params: Result<Query<AlertListParams>, QueryRejection>,
) -> ApiResult<Json<Vec<Alert>>> {
    let Query(params) = params?;
    let filter = params.to_filter()?;
    Ok(Json(state.engine.get_alerts(&filter).await?))
}

async fn get_alert(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Alert>> {
    Ok(Json(state.engine.get_alert_by_id(&id).await?))
}

async fn create_alert(
    State(state): State<AppState>,
    body: Result<Json<Finding>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(finding) = body?;
    let alert = state.engine.create_alert(finding).await?;
    Ok((StatusCode::CREATED, Json(alert)))
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<StatusUpdate>, JsonRejection>,
) -> ApiResult<Json<Alert>> {
    let Json(update) = body?;
    let status = update
        .status
        .ok_or_else(|| ApiError::BadRequest("Status is required".to_string()))?;

    let alert = state
        .engine
        .update_alert_status(&id, &status)
        .await
        .map_err(|e| ApiError::from(e).not_found_as_bad_request())?;
    Ok(Json(alert))
}

async fn delete_alert(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state
        .engine
        .delete_alert(&id)
        .await
        .map_err(|e| ApiError::from(e).not_found_as_bad_request())?;
    Ok(Json(json!({ "message": "Alert deleted successfully" })))
}

async fn statistics(State(state): State<AppState>) -> ApiResult<Json<Statistics>> {
    Ok(Json(state.engine.get_statistics().await?))
}
