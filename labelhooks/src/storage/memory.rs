//! In-memory webhook store

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use super::{StorageError, StorageResult, WebhookFilter, WebhookStore};
use crate::models::{
    BasicUser, NewDelivery, NewWebhook, Webhook, WebhookDelivery, latest_delivery,
};

/// Store keeping every record in process memory.
///
/// Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct InMemoryWebhookStore {
    webhooks: RwLock<BTreeMap<u64, Webhook>>,
    deliveries: RwLock<BTreeMap<u64, WebhookDelivery>>,
    users: RwLock<BTreeMap<u64, BasicUser>>,
    next_webhook_id: AtomicU64,
    next_delivery_id: AtomicU64,
}

impl InMemoryWebhookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user that webhooks may name as owner
    pub async fn insert_user(&self, user: BasicUser) {
        self.users.write().await.insert(user.id, user);
    }

    fn next_id(counter: &AtomicU64) -> u64 {
        counter.fetch_add(1, Ordering::Relaxed) + 1
    }
}

#[async_trait]
impl WebhookStore for InMemoryWebhookStore {
    async fn create_webhook(&self, webhook: NewWebhook) -> StorageResult<Webhook> {
        let id = Self::next_id(&self.next_webhook_id);
        let webhook = webhook.into_webhook(id, Utc::now());
        self.webhooks.write().await.insert(id, webhook.clone());
        debug!(webhook_id = id, "stored webhook");
        Ok(webhook)
    }

    async fn get_webhook(&self, id: u64) -> StorageResult<Option<Webhook>> {
        Ok(self.webhooks.read().await.get(&id).cloned())
    }

    async fn update_webhook(&self, webhook: Webhook) -> StorageResult<Webhook> {
        let mut webhooks = self.webhooks.write().await;
        let slot = webhooks
            .get_mut(&webhook.id)
            .ok_or_else(|| StorageError::NotFound(format!("webhook {}", webhook.id)))?;
        *slot = webhook.clone();
        Ok(webhook)
    }

    async fn delete_webhook(&self, id: u64) -> StorageResult<bool> {
        let removed = self.webhooks.write().await.remove(&id).is_some();
        if removed {
            self.deliveries
                .write()
                .await
                .retain(|_, delivery| delivery.webhook_id != id);
        }
        Ok(removed)
    }

    async fn list_webhooks(&self, filter: &WebhookFilter) -> StorageResult<Vec<Webhook>> {
        Ok(self
            .webhooks
            .read()
            .await
            .values()
            .filter(|webhook| filter.matches(webhook))
            .cloned()
            .collect())
    }

    async fn record_delivery(&self, delivery: NewDelivery) -> StorageResult<WebhookDelivery> {
        // Held until the insert so a concurrent delete cannot orphan the record
        let webhooks = self.webhooks.read().await;
        if !webhooks.contains_key(&delivery.webhook_id) {
            return Err(StorageError::NotFound(format!(
                "webhook {}",
                delivery.webhook_id
            )));
        }

        let id = Self::next_id(&self.next_delivery_id);
        let delivery = delivery.into_delivery(id);
        self.deliveries.write().await.insert(id, delivery.clone());
        drop(webhooks);
        Ok(delivery)
    }

    async fn list_deliveries(&self, webhook_id: u64) -> StorageResult<Vec<WebhookDelivery>> {
        let mut deliveries: Vec<WebhookDelivery> = self
            .deliveries
            .read()
            .await
            .values()
            .filter(|delivery| delivery.webhook_id == webhook_id)
            .cloned()
            .collect();
        deliveries.sort_by(|a, b| (b.delivered_at, b.id).cmp(&(a.delivered_at, a.id)));
        Ok(deliveries)
    }

    async fn get_delivery(
        &self,
        webhook_id: u64,
        delivery_id: u64,
    ) -> StorageResult<Option<WebhookDelivery>> {
        Ok(self
            .deliveries
            .read()
            .await
            .get(&delivery_id)
            .filter(|delivery| delivery.webhook_id == webhook_id)
            .cloned())
    }

    async fn last_delivery(&self, webhook_id: u64) -> StorageResult<Option<WebhookDelivery>> {
        let deliveries = self.deliveries.read().await;
        Ok(latest_delivery(
            deliveries
                .values()
                .filter(|delivery| delivery.webhook_id == webhook_id),
        )
        .cloned())
    }

    async fn get_user(&self, id: u64) -> StorageResult<Option<BasicUser>> {
        Ok(self.users.read().await.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::WebhookScope;
    use crate::models::{ContentType, EventSet};
    use chrono::Duration;

    fn new_webhook(scope: WebhookScope, project_id: Option<u64>) -> NewWebhook {
        NewWebhook {
            target_url: "https://example.com".to_string(),
            scope,
            content_type: ContentType::Json,
            secret: String::new(),
            is_active: true,
            enable_ssl: true,
            owner: None,
            project_id,
            organization_id: None,
            events: EventSet::parse_joined("task_created"),
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let store = InMemoryWebhookStore::new();
        let first = store.create_webhook(new_webhook(WebhookScope::Project, Some(1))).await.unwrap();
        let second = store.create_webhook(new_webhook(WebhookScope::Project, Some(2))).await.unwrap();
        assert_eq!((first.id, second.id), (1, 2));
    }

    #[tokio::test]
    async fn test_filter_by_scope_and_project() {
        let store = InMemoryWebhookStore::new();
        store.create_webhook(new_webhook(WebhookScope::Project, Some(1))).await.unwrap();
        store.create_webhook(new_webhook(WebhookScope::Project, Some(2))).await.unwrap();
        store.create_webhook(new_webhook(WebhookScope::Organization, None)).await.unwrap();

        let projects = store
            .list_webhooks(&WebhookFilter {
                scope: Some(WebhookScope::Project),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(projects.len(), 2);

        let only_two = store
            .list_webhooks(&WebhookFilter {
                project_id: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(only_two.len(), 1);
        assert_eq!(only_two[0].project_id, Some(2));
    }

    #[tokio::test]
    async fn test_deliveries_newest_first_and_deleted_with_webhook() {
        let store = InMemoryWebhookStore::new();
        let webhook = store.create_webhook(new_webhook(WebhookScope::Project, Some(1))).await.unwrap();
        let now = Utc::now();

        store
            .record_delivery(
                NewDelivery::new(webhook.id, "task_created", Some(200))
                    .delivered_at(now - Duration::seconds(30)),
            )
            .await
            .unwrap();
        store
            .record_delivery(NewDelivery::new(webhook.id, "task_created", Some(500)).delivered_at(now))
            .await
            .unwrap();

        let deliveries = store.list_deliveries(webhook.id).await.unwrap();
        assert_eq!(deliveries[0].status_code, Some(500));
        assert_eq!(
            store.last_delivery(webhook.id).await.unwrap().unwrap().status_code,
            Some(500)
        );
        assert!(store.get_delivery(webhook.id + 1, deliveries[0].id).await.unwrap().is_none());

        assert!(store.delete_webhook(webhook.id).await.unwrap());
        assert!(store.list_deliveries(webhook.id).await.unwrap().is_empty());
        assert!(!store.delete_webhook(webhook.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delivery_for_missing_webhook_fails() {
        let store = InMemoryWebhookStore::new();
        let result = store
            .record_delivery(NewDelivery::new(42, "task_created", Some(200)))
            .await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }
}
