//! Error response implementation.

use super::types::ApiError;
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            error!(
                error = %self,
                source = ?std::error::Error::source(&self).map(ToString::to_string),
                code = self.error_code(),
                "Server error occurred"
            );
        } else {
            warn!(error = %self, code = self.error_code(), "Request rejected");
        }

        let status = self.status_code();
        let code = self.error_code();

        let message = match &self {
            ApiError::Internal(err) => {
                // Don't expose internal error details in production
                if cfg!(debug_assertions) {
                    format!("{}: {}", self, err)
                } else {
                    "An internal error occurred".to_string()
                }
            }
            ApiError::Storage(err) => {
                if cfg!(debug_assertions) {
                    err.to_string()
                } else {
                    "A storage error occurred".to_string()
                }
            }
            _ => self.to_string(),
        };

        (status, Json(ErrorResponse { error: message, code })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidQueryParam(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError::NotFound("Alert not found: ALT-1-0".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Alert not found: ALT-1-0");
        assert_eq!(json["code"], "not_found");
    }

    #[tokio::test]
    async fn test_internal_error_status() {
        let response = ApiError::Internal(anyhow::anyhow!("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["code"], "internal_error");
    }
}
