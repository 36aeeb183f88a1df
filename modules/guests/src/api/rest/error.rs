use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::error;

use crate::api::rest::dto::ErrorEnvelope;
use crate::domain::error::DomainError;

pub const REQUIRED_FIELDS_MESSAGE: &str = "name and place are required strings";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Error response carrying the `{success:false, error}` envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorEnvelope {
            success: false,
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Map a domain error to status and client-facing message.
/// Internal details never leave the process; they are logged here.
pub fn map_domain_error(e: &DomainError) -> ApiError {
    match e {
        DomainError::InvalidInput { message } => ApiError::bad_request(message.clone()),
        DomainError::GuestNotFound { .. } => ApiError::new(StatusCode::NOT_FOUND, "Guest not found"),
        DomainError::IdentifierConflict { .. } => {
            ApiError::new(StatusCode::CONFLICT, "identifier already exists")
        }
        DomainError::AllocationExhausted { .. } => ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "Failed to generate unique identifier",
        ),
        DomainError::Database { message } => {
            error!("Database error: {}", message);
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
        }
    }
}
