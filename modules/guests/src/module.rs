use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::GuestsConfig;
use crate::contract::client::GuestsApi;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::GuestsLocalClient;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::SeaOrmGuestsRepository;

/// The guests module: owns the domain service and exposes it over REST and
/// as an in-process client.
#[derive(Clone)]
pub struct GuestsModule {
    service: Arc<Service>,
}

impl GuestsModule {
    pub fn new(db: DatabaseConnection, cfg: &GuestsConfig) -> Self {
        info!("Initializing guests module");
        debug!(
            "Loaded guests config: identifier_bytes={}, max_allocation_attempts={}",
            cfg.identifier_bytes, cfg.max_allocation_attempts
        );

        let repo = SeaOrmGuestsRepository::new(db);
        let service_config = ServiceConfig {
            identifier_bytes: cfg.identifier_bytes,
            max_allocation_attempts: cfg.max_allocation_attempts,
        };
        let service = Service::new(Arc::new(repo), service_config);

        Self {
            service: Arc::new(service),
        }
    }

    /// Bring the schema up to date.
    pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running guests database migrations");
        Migrator::up(db, None).await?;
        info!("Guests database migrations completed successfully");
        Ok(())
    }

    pub fn register_rest(&self, router: Router) -> Router {
        info!("Registering guests REST routes");
        routes::register_routes(router, self.service.clone())
    }

    /// Guest routes on an otherwise empty router.
    pub fn router(&self) -> Router {
        self.register_rest(Router::new())
    }

    pub fn openapi() -> utoipa::openapi::OpenApi {
        routes::openapi()
    }

    pub fn client(&self) -> Arc<dyn GuestsApi> {
        Arc::new(GuestsLocalClient::new(self.service.clone()))
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }
}
