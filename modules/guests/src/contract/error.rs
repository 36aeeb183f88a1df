use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuestsError {
    #[error("Guest not found: {identifier}")]
    NotFound { identifier: String },

    #[error("Identifier '{identifier}' already exists")]
    Conflict { identifier: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Identifier space temporarily exhausted")]
    Unavailable,

    #[error("Internal error")]
    Internal,
}

impl GuestsError {
    pub fn not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            identifier: identifier.into(),
        }
    }

    pub fn conflict(identifier: impl Into<String>) -> Self {
        Self::Conflict {
            identifier: identifier.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

impl From<crate::domain::error::DomainError> for GuestsError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            InvalidInput { message } => Self::validation(message),
            GuestNotFound { identifier } => Self::not_found(identifier),
            IdentifierConflict { identifier } => Self::conflict(identifier),
            AllocationExhausted { .. } => Self::Unavailable,
            Database { .. } => Self::Internal,
        }
    }
}
