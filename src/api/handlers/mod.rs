//! API handlers

pub mod board;
pub mod items;
pub mod pages;
pub mod tasks;
pub mod version;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::error::AppError;
use crate::validation::FieldErrors;

/// Error body shared by every JSON endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

/// [`AppError`] on its way out of a handler
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        Self(AppError::Validation(errors))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, fields) = match self.0 {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, None),
            AppError::Validation(ref fields) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Some(fields.clone()))
            }
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, None),
            ref other => {
                error!(error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, None)
            }
        };
        let body = ErrorResponse {
            error: self.0.to_string(),
            fields,
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
