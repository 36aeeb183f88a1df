use thiserror::Error;

/// Domain-specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{message}")]
    InvalidInput { message: String },

    #[error("Guest not found: {identifier}")]
    GuestNotFound { identifier: String },

    #[error("Identifier '{identifier}' already exists")]
    IdentifierConflict { identifier: String },

    #[error("No free identifier found after {attempts} attempts")]
    AllocationExhausted { attempts: u32 },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn guest_not_found(identifier: impl Into<String>) -> Self {
        Self::GuestNotFound {
            identifier: identifier.into(),
        }
    }

    pub fn identifier_conflict(identifier: impl Into<String>) -> Self {
        Self::IdentifierConflict {
            identifier: identifier.into(),
        }
    }

    pub fn allocation_exhausted(attempts: u32) -> Self {
        Self::AllocationExhausted { attempts }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
