//! Audit trail route.

use super::alerts::parse_param;
use crate::error::ApiResult;
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use vigil_alert_types::{AlertId, AuditEntry, AuditQuery};

/// Create the audit router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_entries))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditParams {
    pub action: Option<String>,
    pub alert_id: Option<String>,
    pub limit: Option<String>,
}

impl AuditParams {
    fn to_query(&self) -> ApiResult<AuditQuery> {
        Ok(AuditQuery {
            action: parse_param("action", self.action.as_deref())?,
            alert_id: self
                .alert_id
                .as_deref()
                .filter(|id| !id.is_empty())
                .map(AlertId::from),
            limit: parse_param("limit", self.limit.as_deref())?,
        })
    }
}

async fn list_entries(
    State(state): State<AppState>,
    params: Result<Query<AuditParams>, QueryRejection>,
) -> ApiResult<Json<Vec<AuditEntry>>> {
    let Query(params) = params?;
    let query = params.to_query()?;
    Ok(Json(state.engine.audit_trail(&query).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_alert_types::AuditAction;

    #[test]
    fn test_query_params() {
        let cases = vec![
            (AuditParams::default(), Some(AuditQuery::all())),
            (
                AuditParams {
                    action: Some("STATUS_UPDATED".into()),
                    alert_id: Some("ALT-1-0".into()),
                    limit: Some("5".into()),
                },
                Some(
                    AuditQuery::all()
                        .with_action(AuditAction::StatusUpdated)
                        .with_alert_id("ALT-1-0")
                        .with_limit(5),
                ),
            ),
            (
                AuditParams {
                    action: Some("status_updated".into()),
                    ..Default::default()
                },
                None,
            ),
            (
                AuditParams {
                    limit: Some("-1".into()),
                    ..Default::default()
                },
                None,
            ),
        ];

        for (params, expected) in cases {
            assert_eq!(params.to_query().ok(), expected, "{:?}", params);
        }
    }
}
