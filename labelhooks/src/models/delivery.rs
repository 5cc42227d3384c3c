//! Webhook delivery records.
//!
//! Deliveries are appended by the dispatch process and never modified here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookDelivery {
    pub id: u64,
    pub webhook_id: u64,
    pub event: String,
    pub status_code: Option<u16>,
    pub redelivery: bool,
    pub delivered_at: DateTime<Utc>,
    /// Comma-joined names of the fields that changed on the source resource
    pub changed_fields: Option<String>,
    pub request: serde_json::Value,
    pub response: serde_json::Value,
}

/// Delivery outcome reported by the dispatcher before the store assigns an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDelivery {
    pub webhook_id: u64,
    pub event: String,
    pub status_code: Option<u16>,
    #[serde(default)]
    pub redelivery: bool,
    #[serde(default = "chrono::Utc::now")]
    pub delivered_at: DateTime<Utc>,
    #[serde(default)]
    pub changed_fields: Option<String>,
    #[serde(default)]
    pub request: serde_json::Value,
    #[serde(default)]
    pub response: serde_json::Value,
}

impl NewDelivery {
    pub fn new(webhook_id: u64, event: impl Into<String>, status_code: Option<u16>) -> Self {
        Self {
            webhook_id,
            event: event.into(),
            status_code,
            redelivery: false,
            delivered_at: Utc::now(),
            changed_fields: None,
            request: serde_json::Value::Null,
            response: serde_json::Value::Null,
        }
    }

    pub fn delivered_at(mut self, at: DateTime<Utc>) -> Self {
        self.delivered_at = at;
        self
    }

    pub fn redelivery(mut self, redelivery: bool) -> Self {
        self.redelivery = redelivery;
        self
    }

    pub fn changed_fields(mut self, fields: impl Into<String>) -> Self {
        self.changed_fields = Some(fields.into());
        self
    }

    pub fn request(mut self, request: serde_json::Value) -> Self {
        self.request = request;
        self
    }

    pub fn response(mut self, response: serde_json::Value) -> Self {
        self.response = response;
        self
    }

    pub fn into_delivery(self, id: u64) -> WebhookDelivery {
        WebhookDelivery {
            id,
            webhook_id: self.webhook_id,
            event: self.event,
            status_code: self.status_code,
            redelivery: self.redelivery,
            delivered_at: self.delivered_at,
            changed_fields: self.changed_fields,
            request: self.request,
            response: self.response,
        }
    }
}

/// The delivery that determines a webhook's `last_status`: newest
/// `delivered_at`, ties broken by the higher id.
pub fn latest_delivery<'a, I>(deliveries: I) -> Option<&'a WebhookDelivery>
where
    I: IntoIterator<Item = &'a WebhookDelivery>,
{
    deliveries
        .into_iter()
        .max_by_key(|delivery| (delivery.delivered_at, delivery.id))
}
