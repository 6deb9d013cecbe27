//! Error types for shopdesk-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use shopdesk_core::error::{ErrorCode, ErrorContext, ErrorDetails, ErrorLogger, DefaultErrorLogger};
use shopdesk_core::{CartError, CoreError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Cart(#[from] CartError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Core(error) => match error.code() {
                ErrorCode::NotLoaded => StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::UnknownEntity | ErrorCode::RecordNotFound => StatusCode::NOT_FOUND,
                ErrorCode::InvalidQuery => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Cart(CartError::DuplicateProduct { .. }) => StatusCode::CONFLICT,
            ApiError::Cart(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn to_details(&self) -> ErrorDetails {
        match self {
            ApiError::NotFound { .. } => ErrorDetails::new(ErrorCode::RecordNotFound, self.to_string()),
            ApiError::BadRequest { .. } => ErrorDetails::new(ErrorCode::InvalidQuery, self.to_string()),
            ApiError::Core(error) => error.to_details(),
            ApiError::Cart(error) => {
                let details = ErrorDetails::new(ErrorCode::CartRejected, error.to_string());
                match error {
                    CartError::DuplicateProduct { .. } => details.with_suggestion(
                        "Edit the existing line instead of adding the product again.".to_string(),
                    ),
                    _ => details,
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let context =
            ErrorContext::new("api".to_string()).with_data("status", serde_json::json!(status.as_u16()));
        match &self {
            ApiError::Core(error) => DefaultErrorLogger.log_error(error, &context),
            other => DefaultErrorLogger.log_warning(&other.to_string(), &context),
        }
        (status, Json(self.to_details())).into_response()
    }
}
