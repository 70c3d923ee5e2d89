//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use usage_meter_core::SourceError;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Upstream data did not match the expected shape.
    #[error("failed to parse upstream response: {0}")]
    UpstreamParse(String),

    /// Upstream was unreachable or answered with a failure status.
    #[error("failed to fetch upstream data: {0}")]
    UpstreamUnavailable(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            Self::UpstreamParse(_) => (
                StatusCode::BAD_REQUEST,
                "upstream_parse_error",
                self.to_string(),
            ),
            Self::UpstreamUnavailable(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "upstream_error",
                self.to_string(),
            ),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<SourceError> for ApiError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Parse { .. } => Self::UpstreamParse(err.to_string()),
            SourceError::Transport { .. } => Self::UpstreamUnavailable(err.to_string()),
            // Tolerated inside the aggregator; reaching here is a bug in
            // the aggregation, not an upstream condition.
            SourceError::ReportNotFound { .. } => Self::Internal(err.to_string()),
        }
    }
}
