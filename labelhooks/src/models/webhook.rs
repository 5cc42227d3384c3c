//! Stored webhook record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BasicUser, EventSet};
use crate::catalog::WebhookScope;

/// Payload encoding used when delivering events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum ContentType {
    #[default]
    #[serde(rename = "application/json")]
    Json,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Json => "application/json",
        }
    }
}

/// A webhook as held by the store.
///
/// `events` keeps the comma-joined column form when serialized so the record
/// mirrors what a relational backend would hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Webhook {
    pub id: u64,
    pub target_url: String,
    #[serde(rename = "type")]
    pub scope: WebhookScope,
    pub content_type: ContentType,
    pub secret: String,
    pub is_active: bool,
    pub enable_ssl: bool,
    pub owner: Option<BasicUser>,
    pub project_id: Option<u64>,
    pub organization_id: Option<u64>,
    #[serde(with = "super::event_set::joined")]
    pub events: EventSet,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

/// Validated fields of a webhook that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewWebhook {
    pub target_url: String,
    pub scope: WebhookScope,
    pub content_type: ContentType,
    pub secret: String,
    pub is_active: bool,
    pub enable_ssl: bool,
    pub owner: Option<BasicUser>,
    pub project_id: Option<u64>,
    pub organization_id: Option<u64>,
    pub events: EventSet,
}

impl NewWebhook {
    /// Materialize the record with the id chosen by the store
    pub fn into_webhook(self, id: u64, now: DateTime<Utc>) -> Webhook {
        Webhook {
            id,
            target_url: self.target_url,
            scope: self.scope,
            content_type: self.content_type,
            secret: self.secret,
            is_active: self.is_active,
            enable_ssl: self.enable_ssl,
            owner: self.owner,
            project_id: self.project_id,
            organization_id: self.organization_id,
            events: self.events,
            created_date: now,
            updated_date: now,
        }
    }
}
