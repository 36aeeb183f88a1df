use async_trait::async_trait;

use crate::contract::{
    error::GuestsError,
    model::{Guest, NewGuest},
};

/// Public API of the guests module for in-process consumers
#[async_trait]
pub trait GuestsApi: Send + Sync {
    /// Register a guest and allocate a fresh identifier
    async fn create_guest(&self, new_guest: NewGuest) -> Result<Guest, GuestsError>;

    /// All guests, oldest first
    async fn list_guests(&self) -> Result<Vec<Guest>, GuestsError>;

    /// Look up a guest by identifier
    async fn get_guest(&self, identifier: &str) -> Result<Guest, GuestsError>;

    /// Mark a guest as checked in. Repeating the call is a no-op.
    async fn check_in_guest(&self, identifier: &str) -> Result<Guest, GuestsError>;
}
