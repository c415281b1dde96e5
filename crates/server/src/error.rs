use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use services::services::{ai_gateway::AiGatewayError, analyzer::AnalyzerError};
use thiserror::Error;

/// Errors surfaced to API callers. Every variant renders as a single
/// `{"error": "..."}` payload with a matching status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("feedback not found")]
    NotFound,
    #[error("configuration error: {0}")]
    Configuration(AiGatewayError),
    #[error("classification service error: {0}")]
    Gateway(AiGatewayError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<AnalyzerError> for ApiError {
    fn from(err: AnalyzerError) -> Self {
        match err {
            AnalyzerError::Validation => Self::Validation(err.to_string()),
            AnalyzerError::Database(e) => Self::Database(e),
            AnalyzerError::Gateway(AiGatewayError::MissingApiKey) => {
                Self::Configuration(AiGatewayError::MissingApiKey)
            }
            AnalyzerError::Gateway(e) => Self::Gateway(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Gateway(_) => StatusCode::BAD_GATEWAY,
            Self::Configuration(_) | Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
