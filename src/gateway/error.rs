use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::gateway::payload::ErrorResponse;
use crate::inference::InferenceError;

/// Message returned for every server-side failure. Causes are only logged.
pub const INTERNAL_ERROR_DETAIL: &str = "Failed to process sentiment analysis request";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Input violated a text constraint.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Body was not valid JSON for the endpoint.
    #[error("invalid request body: {message}")]
    MalformedBody { status: StatusCode, message: String },

    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::MalformedBody { status, .. } => *status,
            ApiError::Inference(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ApiError::Validation(message) => {
                warn!(error = %message, "Validation error");
                ErrorResponse {
                    error: "Validation Error".to_string(),
                    detail: Some(message.clone()),
                }
            }
            ApiError::MalformedBody { message, .. } => {
                warn!(error = %message, "Rejected request body");
                ErrorResponse {
                    error: "Invalid Request".to_string(),
                    detail: Some(message.clone()),
                }
            }
            ApiError::Inference(e) => {
                if e.is_unavailable() {
                    error!(error = %e, "Model unavailable at request time");
                } else {
                    error!(error = %e, "Model error");
                }
                ErrorResponse {
                    error: "Internal Server Error".to_string(),
                    detail: Some(INTERNAL_ERROR_DETAIL.to_string()),
                }
            }
            ApiError::Internal(reason) => {
                error!(error = %reason, "Unexpected error");
                ErrorResponse {
                    error: "Internal Server Error".to_string(),
                    detail: Some(INTERNAL_ERROR_DETAIL.to_string()),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}
