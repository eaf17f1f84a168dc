use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::summarizer::SummarizeError;
use super::types::ErrorResponse;

/// Every way a `/summarize` request can fail.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Model is not available")]
    ModelUnavailable,

    #[error("Missing 'text' key in JSON payload")]
    MissingText,

    #[error("'text' must be a non-empty string")]
    InvalidText,

    /// Details stay in the server log.
    #[error("An internal error occurred")]
    Internal(#[from] SummarizeError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ModelUnavailable | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MissingText | ApiError::InvalidText => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(cause) = &self {
            error!("Error during summarization: {}", cause);
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
