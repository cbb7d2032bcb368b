//! Mapping from [`AppError`] to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::AppError;

/// Error returned by route handlers.
#[derive(Debug)]
pub struct ApiError {
    error: AppError,
    failure: &'static str,
    success_flag: bool,
}

impl ApiError {
    /// Failure while registering and rendering a new form.
    #[must_use]
    pub fn generation(error: AppError) -> Self {
        Self {
            error,
            failure: "Generation Failed",
            success_flag: false,
        }
    }

    /// Failure of an action route whose replies carry `"success"`.
    #[must_use]
    pub fn action(error: AppError) -> Self {
        Self {
            success_flag: true,
            ..Self::from(error)
        }
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self {
            error,
            failure: "Request Failed",
            success_flag: false,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.error {
            AppError::NotFound(_) => {
                let body = if self.success_flag {
                    json!({ "success": false, "message": "Worker not found" })
                } else {
                    json!({ "message": "Worker not found" })
                };
                (StatusCode::NOT_FOUND, Json(body)).into_response()
            }
            AppError::LimitReached(msg) => (StatusCode::FORBIDDEN, msg).into_response(),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            other => {
                error!(err = %other, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": self.failure, "details": other.to_string() })),
                )
                    .into_response()
            }
        }
    }
}
