use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JSON body returned for every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Human readable description of what went wrong
    pub detail: String,
}

impl ErrorDetail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Custom error type for API handler operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested task does not exist.
    #[error("Task not found")]
    NotFound,
    /// The request could not be parsed into the expected shape.
    #[error("{message}")]
    Validation { status: StatusCode, message: String },
    /// Represents a storage or connectivity failure.
    #[error("Database error")]
    Database(#[from] anyhow::Error),
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        ApiError::Database(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, detail) = match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Task not found".to_string()),
            ApiError::Validation { status, message } => (status, message),
            ApiError::Database(err) => {
                tracing::error!("Storage operation failed: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        (status_code, Json(ErrorDetail::new(detail))).into_response()
    }
}
