//! API implementation for the labelhooks HTTP server

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    response::Json,
    routing::get,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

pub mod webhooks;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        webhooks::create_webhook,
        webhooks::list_webhooks,
        webhooks::get_webhook,
        webhooks::update_webhook,
        webhooks::delete_webhook,
        webhooks::list_deliveries,
        webhooks::get_delivery,
        webhooks::list_events,
        health_check,
    ),
    components(
        schemas(
            labelhooks::catalog::WebhookScope,
            labelhooks::models::ContentType,
            labelhooks::models::BasicUser,
            labelhooks::representation::ScopeBinding,
            labelhooks::representation::WebhookRepresentation,
            labelhooks::representation::WebhookWritePayload,
            labelhooks::representation::WebhookPatch,
            labelhooks::representation::DeliveryRepresentation,
            labelhooks::representation::EventsRepresentation,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "webhooks", description = "Project and organization webhook management"),
        (name = "health", description = "Service health"),
    ),
    info(
        title = "Labelhooks API",
        version = "1.0.0",
        description = "RESTful API for managing annotation platform webhooks and reading their delivery history.",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/api", description = "API base path")
    )
)]
pub struct ApiDoc;

/// Create the main router with all API endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route(
            "/webhooks",
            get(webhooks::list_webhooks).post(webhooks::create_webhook),
        )
        .route("/webhooks/events", get(webhooks::list_events))
        .route(
            "/webhooks/{id}",
            get(webhooks::get_webhook)
                .patch(webhooks::update_webhook)
                .delete(webhooks::delete_webhook),
        )
        .route("/webhooks/{id}/deliveries", get(webhooks::list_deliveries))
        .route(
            "/webhooks/{id}/deliveries/{delivery_id}",
            get(webhooks::get_delivery),
        )
        .route("/health", get(health_check))
        .with_state(state);

    let swagger_router = SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi());

    Router::new().nest("/api", api_router).merge(swagger_router)
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health", body = serde_json::Value)
    )
)]
async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "OK",
        "version": labelhooks::VERSION,
        "base_url": state.service.base_url(),
    }))
}
