//! Webhook management API endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State, rejection::JsonRejection, rejection::QueryRejection},
    http::StatusCode,
    response::Json,
};
use labelhooks::catalog::WebhookScope;
use labelhooks::representation::{
    DeliveryRepresentation, EventsRepresentation, WebhookPatch, WebhookRepresentation,
    WebhookWritePayload,
};
use labelhooks::storage::WebhookFilter;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::{ErrorResponse, ServerError, bad_request},
    state::AppState,
};

/// Query parameters for the event listing endpoint
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventsQuery {
    /// Webhook type whose events to list
    #[serde(rename = "type")]
    pub webhook_type: Option<WebhookScope>,
}

/// Create a new webhook
#[utoipa::path(
    post,
    path = "/api/webhooks",
    tag = "webhooks",
    request_body = WebhookWritePayload,
    responses(
        (status = 201, description = "Webhook created successfully", body = WebhookRepresentation),
        (status = 400, description = "Invalid webhook definition", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_webhook(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<WebhookWritePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<WebhookRepresentation>), ServerError> {
    let Json(payload) = payload?;
    let webhook = state.service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(webhook)))
}

/// List webhooks, optionally filtered by type or reference
#[utoipa::path(
    get,
    path = "/api/webhooks",
    tag = "webhooks",
    params(WebhookFilter),
    responses(
        (status = 200, description = "Webhooks matching the filter", body = Vec<WebhookRepresentation>),
        (status = 400, description = "Invalid filter", body = ErrorResponse)
    )
)]
pub async fn list_webhooks(
    State(state): State<Arc<AppState>>,
    filter: Result<Query<WebhookFilter>, QueryRejection>,
) -> Result<Json<Vec<WebhookRepresentation>>, ServerError> {
    let Query(filter) = filter?;
    Ok(Json(state.service.list(&filter).await?))
}

/// Get a webhook by ID
#[utoipa::path(
    get,
    path = "/api/webhooks/{id}",
    tag = "webhooks",
    params(("id" = u64, Path, description = "Webhook ID")),
    responses(
        (status = 200, description = "Webhook found", body = WebhookRepresentation),
        (status = 404, description = "Webhook not found", body = ErrorResponse)
    )
)]
pub async fn get_webhook(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<WebhookRepresentation>, ServerError> {
    Ok(Json(state.service.get(id).await?))
}

/// Partially update a webhook
#[utoipa::path(
    patch,
    path = "/api/webhooks/{id}",
    tag = "webhooks",
    params(("id" = u64, Path, description = "Webhook ID")),
    request_body = WebhookPatch,
    responses(
        (status = 200, description = "Webhook updated successfully", body = WebhookRepresentation),
        (status = 400, description = "Invalid update", body = ErrorResponse),
        (status = 404, description = "Webhook not found", body = ErrorResponse)
    )
)]
pub async fn update_webhook(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    patch: Result<Json<WebhookPatch>, JsonRejection>,
) -> Result<Json<WebhookRepresentation>, ServerError> {
    let Json(patch) = patch?;
    Ok(Json(state.service.update(id, patch).await?))
}

/// Delete a webhook and its delivery history
#[utoipa::path(
    delete,
    path = "/api/webhooks/{id}",
    tag = "webhooks",
    params(("id" = u64, Path, description = "Webhook ID")),
    responses(
        (status = 204, description = "Webhook deleted successfully"),
        (status = 404, description = "Webhook not found", body = ErrorResponse)
    )
)]
pub async fn delete_webhook(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ServerError> {
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List deliveries of a webhook, newest first
#[utoipa::path(
    get,
    path = "/api/webhooks/{id}/deliveries",
    tag = "webhooks",
    params(("id" = u64, Path, description = "Webhook ID")),
    responses(
        (status = 200, description = "Delivery history", body = Vec<DeliveryRepresentation>),
        (status = 404, description = "Webhook not found", body = ErrorResponse)
    )
)]
pub async fn list_deliveries(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Vec<DeliveryRepresentation>>, ServerError> {
    Ok(Json(state.service.deliveries(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/webhooks/{id}/deliveries/{delivery_id}",
    tag = "webhooks",
    params(
        ("id" = u64, Path, description = "Webhook ID"),
        ("delivery_id" = u64, Path, description = "Delivery ID")
    ),
    responses(
        (status = 200, description = "Delivery found", body = DeliveryRepresentation),
        (status = 404, description = "Webhook or delivery not found", body = ErrorResponse)
    )
)]
pub async fn get_delivery(
    State(state): State<Arc<AppState>>,
    Path((id, delivery_id)): Path<(u64, u64)>,
) -> Result<Json<DeliveryRepresentation>, ServerError> {
    Ok(Json(state.service.delivery(id, delivery_id).await?))
}

/// Events accepted by a webhook type
#[utoipa::path(
    get,
    path = "/api/webhooks/events",
    tag = "webhooks",
    params(EventsQuery),
    responses(
        (status = 200, description = "Event names for the type", body = EventsRepresentation),
        (status = 400, description = "Missing or unknown type", body = ErrorResponse)
    )
)]
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    query: Result<Query<EventsQuery>, QueryRejection>,
) -> Result<Json<EventsRepresentation>, ServerError> {
    let Query(query) = query?;
    let scope = query
        .webhook_type
        .ok_or_else(|| bad_request("query parameter 'type' is required"))?;
    Ok(Json(state.service.events_catalog(scope)))
}
