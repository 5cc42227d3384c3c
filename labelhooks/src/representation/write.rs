//! Write payloads: creation and partial update of webhooks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{
    ValidationError, validate_events, validate_scope_refs, validate_target_url,
};
use crate::catalog::WebhookScope;
use crate::models::{BasicUser, ContentType, EventSet, NewWebhook, Webhook};

fn default_true() -> bool {
    true
}

/// Request body for creating a webhook.
///
/// `events` is required and accepts a list of names or one comma-joined
/// string. An empty list subscribes to nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct WebhookWritePayload {
    pub target_url: String,
    #[serde(rename = "type")]
    pub scope: WebhookScope,
    #[serde(default)]
    pub content_type: ContentType,
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_true")]
    pub enable_ssl: bool,
    #[serde(default)]
    pub owner_id: Option<u64>,
    #[serde(default)]
    pub project_id: Option<u64>,
    #[serde(default)]
    pub organization_id: Option<u64>,
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<String>))]
    pub events: EventSet,
}

impl WebhookWritePayload {
    /// Rules that need nothing but the payload itself
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_target_url(&self.target_url)?;
        validate_scope_refs(self.scope, self.project_id, self.organization_id)?;
        validate_events(self.scope, &self.events)
    }

    /// Validate and convert into a record ready for the store.
    ///
    /// `owner` is the user resolved from `owner_id` by the caller.
    pub fn into_new_webhook(self, owner: Option<BasicUser>) -> Result<NewWebhook, ValidationError> {
        self.validate()?;
        Ok(NewWebhook {
            target_url: self.target_url,
            scope: self.scope,
            content_type: self.content_type,
            secret: self.secret,
            is_active: self.is_active,
            enable_ssl: self.enable_ssl,
            owner,
            project_id: self.project_id,
            organization_id: self.organization_id,
            events: self.events,
        })
    }
}

/// Request body for a partial update.
///
/// `type`, `owner_id`, `project_id` and `organization_id` are write-once:
/// they may be repeated with their stored value but never changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct WebhookPatch {
    #[serde(default)]
    pub target_url: Option<String>,
    #[serde(default)]
    pub content_type: Option<ContentType>,
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub enable_ssl: Option<bool>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Vec<String>>))]
    pub events: Option<EventSet>,
    #[serde(default, rename = "type")]
    pub scope: Option<WebhookScope>,
    #[serde(default)]
    pub owner_id: Option<u64>,
    #[serde(default)]
    pub project_id: Option<u64>,
    #[serde(default)]
    pub organization_id: Option<u64>,
}

impl WebhookPatch {
    /// Revalidate the patch against the stored record.
    ///
    /// Events are checked against the stored scope since the scope itself
    /// cannot change.
    pub fn validate_against(&self, instance: &Webhook) -> Result<(), ValidationError> {
        check_write_once("type", self.scope, Some(instance.scope))?;
        check_write_once(
            "owner_id",
            self.owner_id,
            instance.owner.as_ref().map(|owner| owner.id),
        )?;
        check_write_once("project_id", self.project_id, instance.project_id)?;
        check_write_once("organization_id", self.organization_id, instance.organization_id)?;

        if let Some(url) = &self.target_url {
            validate_target_url(url)?;
        }
        if let Some(events) = &self.events {
            validate_events(instance.scope, events)?;
        }
        Ok(())
    }

    /// Validate, then apply the changed fields to `instance`
    pub fn apply(self, instance: &mut Webhook, now: DateTime<Utc>) -> Result<(), ValidationError> {
        self.validate_against(instance)?;

        if let Some(target_url) = self.target_url {
            instance.target_url = target_url;
        }
        if let Some(content_type) = self.content_type {
            instance.content_type = content_type;
        }
        if let Some(secret) = self.secret {
            instance.secret = secret;
        }
        if let Some(is_active) = self.is_active {
            instance.is_active = is_active;
        }
        if let Some(enable_ssl) = self.enable_ssl {
            instance.enable_ssl = enable_ssl;
        }
        if let Some(events) = self.events {
            instance.events = events;
        }
        instance.updated_date = now;
        Ok(())
    }
}

fn check_write_once<T: PartialEq>(
    field: &'static str,
    requested: Option<T>,
    stored: Option<T>,
) -> Result<(), ValidationError> {
    match requested {
        Some(value) if Some(&value) != stored.as_ref() => {
            Err(ValidationError::WriteOnce { field })
        }
        _ => Ok(()),
    }
}
