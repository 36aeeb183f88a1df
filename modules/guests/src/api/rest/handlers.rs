use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path},
    http::StatusCode,
    response::Json,
    Extension,
};
use tracing::{info, warn};

use crate::api::rest::dto::{CreateGuestReq, ErrorEnvelope, GuestEnvelope, GuestListEnvelope};
use crate::api::rest::error::{map_domain_error, ApiError, REQUIRED_FIELDS_MESSAGE};
use crate::domain::service::Service;

/// Register a guest and allocate an identifier
#[utoipa::path(
    post,
    path = "/api/guests",
    tag = "guests",
    request_body = CreateGuestReq,
    responses(
        (status = 201, description = "Guest registered", body = GuestEnvelope),
        (status = 400, description = "Missing, non-text or blank fields", body = ErrorEnvelope),
        (status = 409, description = "Identifier collided at insert", body = ErrorEnvelope),
        (status = 503, description = "No free identifier found", body = ErrorEnvelope),
        (status = 500, description = "Internal error", body = ErrorEnvelope)
    )
)]
pub async fn create_guest(
    Extension(svc): Extension<Arc<Service>>,
    payload: Result<Json<CreateGuestReq>, JsonRejection>,
) -> Result<(StatusCode, Json<GuestEnvelope>), ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        warn!("Rejected guest payload: {}", rejection.body_text());
        ApiError::bad_request(REQUIRED_FIELDS_MESSAGE)
    })?;
    info!("Creating guest");

    match svc.create_guest(req.into()).await {
        Ok(guest) => Ok((StatusCode::CREATED, Json(GuestEnvelope::ok(guest)))),
        Err(e) => {
            warn!("Failed to create guest: {}", e);
            Err(map_domain_error(&e))
        }
    }
}

/// List every guest in registration order
#[utoipa::path(
    get,
    path = "/api/guests",
    tag = "guests",
    responses(
        (status = 200, description = "All guests", body = GuestListEnvelope),
        (status = 500, description = "Internal error", body = ErrorEnvelope)
    )
)]
pub async fn list_guests(
    Extension(svc): Extension<Arc<Service>>,
) -> Result<Json<GuestListEnvelope>, ApiError> {
    info!("Listing guests");

    svc.list_guests()
        .await
        .map(|guests| Json(GuestListEnvelope::ok(guests)))
        .map_err(|e| {
            warn!("Failed to list guests: {}", e);
            map_domain_error(&e)
        })
}

/// Fetch a guest by identifier
#[utoipa::path(
    get,
    path = "/api/guests/{identifier}",
    tag = "guests",
    params(("identifier" = String, Path, description = "Guest identifier")),
    responses(
        (status = 200, description = "Guest found", body = GuestEnvelope),
        (status = 404, description = "Unknown identifier", body = ErrorEnvelope),
        (status = 500, description = "Internal error", body = ErrorEnvelope)
    )
)]
pub async fn get_guest(
    Extension(svc): Extension<Arc<Service>>,
    Path(identifier): Path<String>,
) -> Result<Json<GuestEnvelope>, ApiError> {
    info!("Getting guest {}", identifier);

    match svc.get_guest(&identifier).await {
        Ok(guest) => Ok(Json(GuestEnvelope::ok(guest))),
        Err(e) => {
            warn!("Failed to get guest {}: {}", identifier, e);
            Err(map_domain_error(&e))
        }
    }
}

/// Check a guest in. Idempotent.
#[utoipa::path(
    patch,
    path = "/api/guests/{identifier}/checkin",
    tag = "guests",
    params(("identifier" = String, Path, description = "Guest identifier")),
    responses(
        (status = 200, description = "Guest checked in", body = GuestEnvelope),
        (status = 404, description = "Unknown identifier", body = ErrorEnvelope),
        (status = 500, description = "Internal error", body = ErrorEnvelope)
    )
)]
pub async fn check_in_guest(
    Extension(svc): Extension<Arc<Service>>,
    Path(identifier): Path<String>,
) -> Result<Json<GuestEnvelope>, ApiError> {
    info!("Checking in guest {}", identifier);

    match svc.check_in(&identifier).await {
        Ok(guest) => Ok(Json(GuestEnvelope::ok(guest))),
        Err(e) => {
            warn!("Failed to check in guest {}: {}", identifier, e);
            Err(map_domain_error(&e))
        }
    }
}
