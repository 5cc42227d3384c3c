//! Webhook service: validate, persist, render.
//!
//! Validation always completes before the store is called. Storage errors are
//! returned unchanged inside [`WebhookError::Storage`].

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::catalog::WebhookScope;
use crate::models::{BasicUser, Webhook};
use crate::representation::{
    DeliveryRepresentation, EventsRepresentation, ValidationError, WebhookPatch,
    WebhookRepresentation, WebhookWritePayload, serialize_delivery, serialize_events_catalog,
    serialize_for_read,
};
use crate::storage::{WebhookFilter, WebhookStore};
use crate::{Result, WebhookError};

#[derive(Debug, Clone)]
pub struct WebhookService {
    store: Arc<dyn WebhookStore>,
    base_url: String,
}

impl WebhookService {
    /// `base_url` prefixes the hyperlinks rendered in representations
    pub fn new(store: Arc<dyn WebhookStore>, base_url: impl Into<String>) -> Self {
        Self {
            store,
            base_url: base_url.into(),
        }
    }

    pub fn store(&self) -> &Arc<dyn WebhookStore> {
        &self.store
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a webhook and return its read representation
    pub async fn create(&self, payload: WebhookWritePayload) -> Result<WebhookRepresentation> {
        if let Err(e) = payload.validate() {
            warn!(scope = %payload.scope, error = %e, "rejected webhook definition");
            return Err(e.into());
        }

        let owner = self.resolve_owner(payload.owner_id).await?;
        let webhook = self
            .store
            .create_webhook(payload.into_new_webhook(owner)?)
            .await?;

        info!(
            webhook_id = webhook.id,
            scope = %webhook.scope,
            events = %webhook.events,
            "created webhook"
        );
        // A fresh webhook has no deliveries
        Ok(serialize_for_read(&webhook, None, &self.base_url))
    }

    /// Apply a partial update, revalidated against the stored record
    pub async fn update(&self, id: u64, patch: WebhookPatch) -> Result<WebhookRepresentation> {
        let mut webhook = self.fetch(id).await?;
        if let Err(e) = patch.apply(&mut webhook, Utc::now()) {
            warn!(webhook_id = id, error = %e, "rejected webhook update");
            return Err(e.into());
        }

        let webhook = self.store.update_webhook(webhook).await?;
        info!(webhook_id = id, "updated webhook");
        self.render(&webhook).await
    }

    pub async fn get(&self, id: u64) -> Result<WebhookRepresentation> {
        debug!(webhook_id = id, "reading webhook");
        let webhook = self.fetch(id).await?;
        self.render(&webhook).await
    }

    pub async fn list(&self, filter: &WebhookFilter) -> Result<Vec<WebhookRepresentation>> {
        let webhooks = self.store.list_webhooks(filter).await?;
        let mut representations = Vec::with_capacity(webhooks.len());
        for webhook in &webhooks {
            representations.push(self.render(webhook).await?);
        }
        Ok(representations)
    }

    /// Delete a webhook and its deliveries
    pub async fn delete(&self, id: u64) -> Result<()> {
        if !self.store.delete_webhook(id).await? {
            return Err(WebhookError::webhook_not_found(id));
        }
        info!(webhook_id = id, "deleted webhook");
        Ok(())
    }

    /// Deliveries of a webhook, newest first
    pub async fn deliveries(&self, webhook_id: u64) -> Result<Vec<DeliveryRepresentation>> {
        self.fetch(webhook_id).await?;
        let deliveries = self.store.list_deliveries(webhook_id).await?;
        Ok(deliveries.iter().map(serialize_delivery).collect())
    }

    pub async fn delivery(&self, webhook_id: u64, delivery_id: u64) -> Result<DeliveryRepresentation> {
        self.fetch(webhook_id).await?;
        self.store
            .get_delivery(webhook_id, delivery_id)
            .await?
            .map(|delivery| serialize_delivery(&delivery))
            .ok_or_else(|| WebhookError::delivery_not_found(delivery_id))
    }

    /// Event names accepted for a scope
    pub fn events_catalog(&self, scope: WebhookScope) -> EventsRepresentation {
        serialize_events_catalog(scope)
    }

    async fn fetch(&self, id: u64) -> Result<Webhook> {
        self.store
            .get_webhook(id)
            .await?
            .ok_or_else(|| WebhookError::webhook_not_found(id))
    }

    async fn render(&self, webhook: &Webhook) -> Result<WebhookRepresentation> {
        let last = self.store.last_delivery(webhook.id).await?;
        Ok(serialize_for_read(webhook, last.as_ref(), &self.base_url))
    }

    async fn resolve_owner(&self, owner_id: Option<u64>) -> Result<Option<BasicUser>> {
        match owner_id {
            None => Ok(None),
            Some(id) => match self.store.get_user(id).await? {
                Some(user) => Ok(Some(user)),
                None => {
                    warn!(owner_id = id, "webhook owner does not exist");
                    Err(ValidationError::UnknownOwner(id).into())
                }
            },
        }
    }
}
