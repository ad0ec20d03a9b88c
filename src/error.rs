use crate::db::StoreError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

/// Body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("Database error")]
    Store(#[from] StoreError),
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn missing_token() -> Self {
        AppError::Unauthorized("Authorization token required")
    }

    pub fn invalid_token() -> Self {
        AppError::Unauthorized("Invalid or expired token")
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Server-side failures keep their detail in the log only
        match self {
            AppError::Store(e) => error!(error = %e, "Credential store failure"),
            AppError::Internal(detail) => error!(error = %detail, "Internal failure"),
            _ => {}
        }

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
