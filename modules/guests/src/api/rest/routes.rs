use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Extension, Router,
};
use utoipa::OpenApi;

use crate::api::rest::{dto, handlers};
use crate::domain::service::Service;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::create_guest,
        handlers::list_guests,
        handlers::get_guest,
        handlers::check_in_guest
    ),
    components(schemas(
        dto::GuestDto,
        dto::CreateGuestReq,
        dto::GuestEnvelope,
        dto::GuestListEnvelope,
        dto::ErrorEnvelope
    )),
    tags((name = "guests", description = "Guest registration and check-in"))
)]
pub struct GuestsApiDoc;

/// Attach the guest endpoints to `router`.
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    router
        .route(
            "/api/guests",
            post(handlers::create_guest).get(handlers::list_guests),
        )
        .route("/api/guests/{identifier}", get(handlers::get_guest))
        .route(
            "/api/guests/{identifier}/checkin",
            patch(handlers::check_in_guest),
        )
        .layer(Extension(service))
}

pub fn openapi() -> utoipa::openapi::OpenApi {
    GuestsApiDoc::openapi()
}
