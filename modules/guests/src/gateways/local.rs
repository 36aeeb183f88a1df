use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::GuestsApi,
    error::GuestsError,
    model::{Guest, NewGuest},
};
use crate::domain::service::Service;

/// In-process `GuestsApi` that delegates to the domain service
pub struct GuestsLocalClient {
    service: Arc<Service>,
}

impl GuestsLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl GuestsApi for GuestsLocalClient {
    async fn create_guest(&self, new_guest: NewGuest) -> Result<Guest, GuestsError> {
        self.service
            .create_guest(new_guest)
            .await
            .map_err(Into::into)
    }

    async fn list_guests(&self) -> Result<Vec<Guest>, GuestsError> {
        self.service.list_guests().await.map_err(Into::into)
    }

    async fn get_guest(&self, identifier: &str) -> Result<Guest, GuestsError> {
        self.service.get_guest(identifier).await.map_err(Into::into)
    }

    async fn check_in_guest(&self, identifier: &str) -> Result<Guest, GuestsError> {
        self.service.check_in(identifier).await.map_err(Into::into)
    }
}
