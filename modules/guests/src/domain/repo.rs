use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::contract::model::Guest;
use crate::domain::error::DomainError;

/// A guest as the service hands it to storage. The store assigns `id`.
#[derive(Debug, Clone)]
pub struct GuestRecord {
    pub name: String,
    pub place: String,
    pub identifier: String,
    pub checked_in: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Storage failures the domain can tell apart.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The unique index on `identifier` rejected the insert.
    #[error("identifier '{0}' already exists")]
    DuplicateIdentifier(String),

    #[error(transparent)]
    Unavailable(#[from] anyhow::Error),
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateIdentifier(identifier) => {
                DomainError::identifier_conflict(identifier)
            }
            StoreError::Unavailable(e) => DomainError::database(format!("{e:#}")),
        }
    }
}

/// Port for the domain layer: persistence operations the domain needs.
#[async_trait]
pub trait GuestsRepository: Send + Sync {
    async fn identifier_exists(&self, identifier: &str) -> Result<bool, StoreError>;

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Guest>, StoreError>;

    /// Persist a new guest. Fails with `DuplicateIdentifier` when the
    /// identifier is already taken, even if `identifier_exists` said otherwise.
    async fn insert(&self, record: GuestRecord) -> Result<Guest, StoreError>;

    /// Every guest ordered by `created_at`, then `id`.
    async fn list_by_creation(&self) -> Result<Vec<Guest>, StoreError>;

    /// Flip `checked_in` to true in a single conditional write, touching
    /// `updated_at` only on the transition. Returns the stored guest
    /// afterwards, or `None` when no guest has this identifier.
    async fn mark_checked_in(
        &self,
        identifier: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Guest>, StoreError>;
}
