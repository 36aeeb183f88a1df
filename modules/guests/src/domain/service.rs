use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::contract::model::{Guest, NewGuest};
use crate::domain::allocator::{IdentifierAllocator, IdentifierSource, RandomHexSource};
use crate::domain::error::DomainError;
use crate::domain::repo::{GuestRecord, GuestsRepository, StoreError};

pub const EMPTY_FIELDS_MESSAGE: &str = "name and place cannot be empty";

/// Domain service for guest registration and check-in.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn GuestsRepository>,
    allocator: IdentifierAllocator,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub identifier_bytes: usize,
    pub max_allocation_attempts: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            identifier_bytes: 4,
            max_allocation_attempts: 5,
        }
    }
}

impl Service {
    pub fn new(repo: Arc<dyn GuestsRepository>, config: ServiceConfig) -> Self {
        let source = Arc::new(RandomHexSource::new(config.identifier_bytes));
        Self::with_identifier_source(repo, source, config)
    }

    pub fn with_identifier_source(
        repo: Arc<dyn GuestsRepository>,
        source: Arc<dyn IdentifierSource>,
        config: ServiceConfig,
    ) -> Self {
        let allocator =
            IdentifierAllocator::new(repo.clone(), source, config.max_allocation_attempts);
        Self { repo, allocator }
    }

    #[instrument(
        name = "guests.service.create_guest",
        skip(self, new_guest),
        fields(identifier)
    )]
    pub async fn create_guest(&self, new_guest: NewGuest) -> Result<Guest, DomainError> {
        info!("Registering new guest");

        let (name, place) = Self::validate_new_guest(new_guest)?;

        // A candidate that passed the allocator's check can still lose the
        // race at insert time; draw again until attempts run out.
        let mut attempt = 0;
        loop {
            attempt += 1;
            let identifier = self.allocator.allocate().await?;
            let now = Utc::now();
            let record = GuestRecord {
                name: name.clone(),
                place: place.clone(),
                identifier,
                checked_in: false,
                created_at: now,
                updated_at: now,
            };

            match self.repo.insert(record).await {
                Ok(guest) => {
                    tracing::Span::current().record("identifier", guest.identifier.as_str());
                    info!("Successfully registered guest id={}", guest.id);
                    return Ok(guest);
                }
                Err(StoreError::DuplicateIdentifier(identifier))
                    if attempt < self.allocator.max_attempts() =>
                {
                    warn!(attempt, %identifier, "identifier taken at insert, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    #[instrument(name = "guests.service.list_guests", skip(self))]
    pub async fn list_guests(&self) -> Result<Vec<Guest>, DomainError> {
        debug!("Listing guests");
        let guests = self.repo.list_by_creation().await?;
        debug!("Listed {} guests", guests.len());
        Ok(guests)
    }

    #[instrument(name = "guests.service.get_guest", skip(self), fields(identifier = %identifier))]
    pub async fn get_guest(&self, identifier: &str) -> Result<Guest, DomainError> {
        debug!("Getting guest by identifier");
        self.repo
            .find_by_identifier(identifier)
            .await?
            .ok_or_else(|| DomainError::guest_not_found(identifier))
    }

    #[instrument(name = "guests.service.check_in", skip(self), fields(identifier = %identifier))]
    pub async fn check_in(&self, identifier: &str) -> Result<Guest, DomainError> {
        info!("Checking in guest");
        let guest = self
            .repo
            .mark_checked_in(identifier, Utc::now())
            .await?
            .ok_or_else(|| DomainError::guest_not_found(identifier))?;
        debug!(checked_in = guest.checked_in, "Check-in applied");
        Ok(guest)
    }

    fn validate_new_guest(new_guest: NewGuest) -> Result<(String, String), DomainError> {
        let name = new_guest.name.trim();
        let place = new_guest.place.trim();
        if name.is_empty() || place.is_empty() {
            return Err(DomainError::invalid_input(EMPTY_FIELDS_MESSAGE));
        }
        Ok((name.to_owned(), place.to_owned()))
    }
}
