//! Identifier allocation: draw random candidates and keep the first one the
//! store does not know yet, within a bounded number of attempts.

use std::sync::Arc;

use rand::RngCore;
use tracing::{debug, warn};

use crate::config::MAX_IDENTIFIER_BYTES;
use crate::domain::error::DomainError;
use crate::domain::repo::GuestsRepository;

/// Produces identifier candidates. Swapped out in tests to force collisions.
pub trait IdentifierSource: Send + Sync {
    fn candidate(&self) -> String;
}

/// `bytes` random bytes rendered as lowercase hex.
#[derive(Debug, Clone)]
pub struct RandomHexSource {
    bytes: usize,
}

impl RandomHexSource {
    pub fn new(bytes: usize) -> Self {
        Self {
            bytes: bytes.clamp(1, MAX_IDENTIFIER_BYTES),
        }
    }
}

impl IdentifierSource for RandomHexSource {
    fn candidate(&self) -> String {
        let mut buf = vec![0u8; self.bytes];
        rand::thread_rng().fill_bytes(&mut buf);
        hex::encode(buf)
    }
}

#[derive(Clone)]
pub struct IdentifierAllocator {
    repo: Arc<dyn GuestsRepository>,
    source: Arc<dyn IdentifierSource>,
    max_attempts: u32,
}

impl IdentifierAllocator {
    pub fn new(
        repo: Arc<dyn GuestsRepository>,
        source: Arc<dyn IdentifierSource>,
        max_attempts: u32,
    ) -> Self {
        Self {
            repo,
            source,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Return an identifier unused at the time of the check.
    ///
    /// Uniqueness is only advisory here; the store's unique index is what
    /// finally settles a race between two concurrent registrations.
    pub async fn allocate(&self) -> Result<String, DomainError> {
        for attempt in 1..=self.max_attempts {
            let candidate = self.source.candidate();
            if !self.repo.identifier_exists(&candidate).await? {
                debug!(attempt, identifier = %candidate, "identifier allocated");
                return Ok(candidate);
            }
            debug!(attempt, identifier = %candidate, "identifier collision");
        }

        warn!(
            attempts = self.max_attempts,
            "identifier allocation exhausted"
        );
        Err(DomainError::allocation_exhausted(self.max_attempts))
    }
}
