//! HTTP front door: assembles module routes behind the shared middleware
//! stack and serves them until cancelled.

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware::{from_fn, map_response},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};
use utoipa::openapi::{InfoBuilder, OpenApi, OpenApiBuilder};

mod config;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;

pub struct ApiIngress {
    config: ApiIngressConfig,
    openapi: OpenApi,
}

impl Default for ApiIngress {
    fn default() -> Self {
        Self::new(ApiIngressConfig::default())
    }
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        let openapi = OpenApiBuilder::new()
            .info(
                InfoBuilder::new()
                    .title("Guestlist API")
                    .version(env!("CARGO_PKG_VERSION"))
                    .build(),
            )
            .build();
        Self { config, openapi }
    }

    /// Merge a module's OpenAPI fragment into the served document.
    pub fn with_openapi(mut self, doc: OpenApi) -> Self {
        self.openapi.merge(doc);
        self
    }

    pub fn config(&self) -> &ApiIngressConfig {
        &self.config
    }

    pub fn openapi(&self) -> &OpenApi {
        &self.openapi
    }

    /// Build the HTTP router around the given module routes.
    pub fn build_router(&self, routes: Router) -> Router {
        let mut router = Router::new()
            .route("/health", get(web::health_check))
            .merge(routes);

        if self.config.enable_docs {
            let doc = Arc::new(self.openapi.clone());
            router = router
                .route("/openapi.json", get(web::serve_openapi).with_state(doc))
                .route("/docs", get(web::serve_docs));
        }

        // Oversized bodies surface as extractor rejections inside handlers,
        // so they answer with the handler's own error envelope.
        router = router
            .method_not_allowed_fallback(web::method_not_allowed)
            .fallback(web::not_found)
            .layer(DefaultBodyLimit::max(self.config.body_limit_bytes))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(self.config.request_timeout_sec.max(1)),
            ))
            .layer(map_response(web::envelope_bare_errors));

        if self.config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        // Applied last = outermost. Request path order:
        // SetRequestId -> PropagateRequestId -> Trace -> push_req_id_to_extensions -> ...
        let x_request_id = request_id::header();
        router
            .layer(from_fn(request_id::push_req_id_to_extensions))
            .layer(request_id::create_trace_layer())
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId))
    }

    /// Serve `router` on `listener` until `cancel` fires, then drain in-flight
    /// requests.
    pub async fn serve(
        &self,
        listener: TcpListener,
        router: Router,
        cancel: CancellationToken,
    ) -> Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!("HTTP server bound on {}", addr);

        let shutdown = async move {
            cancel.cancelled().await;
            tracing::info!("HTTP server shutting down gracefully (cancellation)");
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }
}
