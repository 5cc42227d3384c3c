//! Application state management

use labelhooks::service::WebhookService;

use crate::config::ServerConfig;

/// Application state shared across all handlers
#[derive(Debug)]
pub struct AppState {
    /// Webhook service backed by the configured store
    pub service: WebhookService,

    /// Server configuration
    pub config: ServerConfig,
}

impl AppState {
    /// Create new application state
    pub fn new(service: WebhookService, config: ServerConfig) -> Self {
        Self { service, config }
    }
}
