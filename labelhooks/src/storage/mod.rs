//! Persistence interface for webhooks, deliveries and users.
//!
//! The representation layer never talks to a database directly; it goes
//! through [`WebhookStore`]. [`InMemoryWebhookStore`] backs tests and
//! single-process deployments.

mod memory;

pub use memory::InMemoryWebhookStore;

use std::fmt::Debug;

use async_trait::async_trait;
use serde::Deserialize;

use crate::catalog::WebhookScope;
use crate::models::{BasicUser, NewDelivery, NewWebhook, Webhook, WebhookDelivery};

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Data not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Backend-specific error
    #[error("Backend error: {0}")]
    Backend(String),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Criteria for listing webhooks. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct WebhookFilter {
    #[serde(default, rename = "type")]
    pub scope: Option<WebhookScope>,
    #[serde(default)]
    pub project_id: Option<u64>,
    #[serde(default)]
    pub organization_id: Option<u64>,
}

impl WebhookFilter {
    pub fn matches(&self, webhook: &Webhook) -> bool {
        self.scope.is_none_or(|scope| scope == webhook.scope)
            && self
                .project_id
                .is_none_or(|id| webhook.project_id == Some(id))
            && self
                .organization_id
                .is_none_or(|id| webhook.organization_id == Some(id))
    }
}

#[async_trait]
pub trait WebhookStore: Send + Sync + Debug + 'static {
    /// Persist a new webhook and assign its id
    async fn create_webhook(&self, webhook: NewWebhook) -> StorageResult<Webhook>;

    async fn get_webhook(&self, id: u64) -> StorageResult<Option<Webhook>>;

    /// Replace a stored webhook. Fails with `NotFound` if it does not exist.
    async fn update_webhook(&self, webhook: Webhook) -> StorageResult<Webhook>;

    /// Delete a webhook together with its deliveries
    async fn delete_webhook(&self, id: u64) -> StorageResult<bool>;

    /// Webhooks matching the filter, ordered by id
    async fn list_webhooks(&self, filter: &WebhookFilter) -> StorageResult<Vec<Webhook>>;

    /// Append a delivery record for an existing webhook
    async fn record_delivery(&self, delivery: NewDelivery) -> StorageResult<WebhookDelivery>;

    /// Deliveries of a webhook, newest first
    async fn list_deliveries(&self, webhook_id: u64) -> StorageResult<Vec<WebhookDelivery>>;

    async fn get_delivery(
        &self,
        webhook_id: u64,
        delivery_id: u64,
    ) -> StorageResult<Option<WebhookDelivery>>;

    /// The delivery with the newest `delivered_at`
    async fn last_delivery(&self, webhook_id: u64) -> StorageResult<Option<WebhookDelivery>>;

    async fn get_user(&self, id: u64) -> StorageResult<Option<BasicUser>>;
}
