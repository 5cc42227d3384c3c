//! Read representation of webhooks.
//!
//! The project/organization reference is rendered through [`ScopeBinding`],
//! a sum type tagged by `type`: a project webhook never carries an
//! `organization` key and an organization webhook never carries `project`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{WebhookScope, events_for};
use crate::models::{BasicUser, ContentType, EventSet, Webhook, WebhookDelivery};

/// Scope discriminator together with the reference that belongs to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScopeBinding {
    Project { project: Option<u64> },
    Organization { organization: Option<u64> },
}

impl ScopeBinding {
    /// Keep only the reference matching the webhook's scope
    pub fn project(scope: WebhookScope, project: Option<u64>, organization: Option<u64>) -> Self {
        match scope {
            WebhookScope::Project => ScopeBinding::Project { project },
            WebhookScope::Organization => ScopeBinding::Organization { organization },
        }
    }

    pub fn scope(&self) -> WebhookScope {
        match self {
            ScopeBinding::Project { .. } => WebhookScope::Project,
            ScopeBinding::Organization { .. } => WebhookScope::Organization,
        }
    }
}

/// External view of a stored webhook. `secret` is never rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct WebhookRepresentation {
    pub id: u64,
    /// Hyperlink to this resource
    pub url: String,
    pub target_url: String,
    #[serde(flatten)]
    pub binding: ScopeBinding,
    pub content_type: ContentType,
    pub is_active: bool,
    pub enable_ssl: bool,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
    pub owner: Option<BasicUser>,
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<String>))]
    pub events: EventSet,
    /// Status code of the most recent delivery
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_status: Option<u16>,
}

impl WebhookRepresentation {
    pub fn scope(&self) -> WebhookScope {
        self.binding.scope()
    }
}

/// Hyperlink of a webhook resource
pub fn webhook_url(base_url: &str, id: u64) -> String {
    format!("{}/api/webhooks/{}", base_url.trim_end_matches('/'), id)
}

/// Render a stored webhook.
///
/// `last_delivery` is the webhook's newest delivery, if any; see
/// [`crate::models::latest_delivery`].
pub fn serialize_for_read(
    webhook: &Webhook,
    last_delivery: Option<&WebhookDelivery>,
    base_url: &str,
) -> WebhookRepresentation {
    WebhookRepresentation {
        id: webhook.id,
        url: webhook_url(base_url, webhook.id),
        target_url: webhook.target_url.clone(),
        binding: ScopeBinding::project(webhook.scope, webhook.project_id, webhook.organization_id),
        content_type: webhook.content_type,
        is_active: webhook.is_active,
        enable_ssl: webhook.enable_ssl,
        created_date: webhook.created_date,
        updated_date: webhook.updated_date,
        owner: webhook.owner.clone(),
        events: webhook.events.clone(),
        last_status: last_delivery.and_then(|delivery| delivery.status_code),
    }
}

/// Events a scope accepts, as served by the event listing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EventsRepresentation {
    pub webhook_type: WebhookScope,
    pub events: Vec<String>,
}

pub fn serialize_events_catalog(scope: WebhookScope) -> EventsRepresentation {
    EventsRepresentation {
        webhook_type: scope,
        events: events_for(scope).iter().map(|name| name.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewDelivery, NewWebhook};
    use serde_json::json;

    fn webhook(scope: WebhookScope, project: Option<u64>, organization: Option<u64>) -> Webhook {
        NewWebhook {
            target_url: "https://example.com/hook".to_string(),
            scope,
            content_type: ContentType::Json,
            secret: "s3cr3t".to_string(),
            is_active: true,
            enable_ssl: false,
            owner: Some(BasicUser::new(1, "admin")),
            project_id: project,
            organization_id: organization,
            events: EventSet::parse_joined("task_created"),
        }
        .into_webhook(12, Utc::now())
    }

    #[test]
    fn test_project_webhook_omits_organization() {
        // organization_id set directly on the record to show it is projected away
        let repr = serialize_for_read(
            &webhook(WebhookScope::Project, Some(4), Some(9)),
            None,
            "http://localhost:3000",
        );
        let value = serde_json::to_value(&repr).unwrap();

        assert_eq!(value["type"], json!("project"));
        assert_eq!(value["project"], json!(4));
        assert!(value.get("organization").is_none());
    }

    #[test]
    fn test_organization_webhook_omits_project() {
        let repr = serialize_for_read(
            &webhook(WebhookScope::Organization, None, Some(9)),
            None,
            "http://localhost:3000",
        );
        let value = serde_json::to_value(&repr).unwrap();

        assert_eq!(value["type"], json!("organization"));
        assert_eq!(value["organization"], json!(9));
        assert!(value.get("project").is_none());
    }

    #[test]
    fn test_unset_reference_renders_null() {
        let repr = serialize_for_read(&webhook(WebhookScope::Project, None, None), None, "");
        let value = serde_json::to_value(&repr).unwrap();
        assert!(value["project"].is_null());
        assert!(value.as_object().unwrap().contains_key("project"));
    }

    #[test]
    fn test_secret_never_rendered_and_url_is_hyperlink() {
        let repr = serialize_for_read(
            &webhook(WebhookScope::Project, Some(1), None),
            None,
            "https://annotate.example.com/",
        );
        let value = serde_json::to_value(&repr).unwrap();

        assert!(value.get("secret").is_none());
        assert_eq!(value["url"], json!("https://annotate.example.com/api/webhooks/12"));
        assert_eq!(value["owner"]["username"], json!("admin"));
        assert_eq!(value["events"], json!(["task_created"]));
    }

    #[test]
    fn test_last_status() {
        let hook = webhook(WebhookScope::Project, Some(1), None);

        let value = serde_json::to_value(serialize_for_read(&hook, None, "")).unwrap();
        assert!(value.get("last_status").is_none());

        let delivery = NewDelivery::new(hook.id, "task_created", Some(502)).into_delivery(1);
        let repr = serialize_for_read(&hook, Some(&delivery), "");
        assert_eq!(repr.last_status, Some(502));
    }

    #[test]
    fn test_representation_reads_back() {
        let repr = serialize_for_read(&webhook(WebhookScope::Organization, None, Some(2)), None, "");
        let parsed: WebhookRepresentation =
            serde_json::from_value(serde_json::to_value(&repr).unwrap()).unwrap();
        assert_eq!(parsed, repr);
        assert_eq!(parsed.scope(), WebhookScope::Organization);
    }

    #[test]
    fn test_events_catalog_representation() {
        let repr = serialize_events_catalog(WebhookScope::Project);
        assert_eq!(repr.webhook_type, WebhookScope::Project);
        assert!(repr.events.contains(&"issue_resolved".to_string()));
        assert!(!repr.events.contains(&"project_deleted".to_string()));
    }
}
