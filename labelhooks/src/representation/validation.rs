//! Validation rules applied to incoming webhook definitions.
//!
//! Everything here runs before the store is touched, so a rejected request
//! never leaves a partial write behind.

use serde_json::json;

use crate::catalog::{WebhookScope, events_for};
use crate::models::EventSet;

/// Reasons a webhook write is rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid events list for {scope} webhook: {}", .invalid.join(", "))]
    EventsNotAllowed {
        scope: WebhookScope,
        invalid: Vec<String>,
    },

    #[error("Invalid target URL '{0}': URL must start with http:// or https://")]
    InvalidTargetUrl(String),

    #[error("{field} cannot be set for a {scope} webhook")]
    ScopeMismatch {
        scope: WebhookScope,
        field: &'static str,
    },

    #[error("{field} is required for a {scope} webhook")]
    MissingReference {
        scope: WebhookScope,
        field: &'static str,
    },

    #[error("{field} cannot be changed after the webhook is created")]
    WriteOnce { field: &'static str },

    #[error("User with id '{0}' does not exist")]
    UnknownOwner(u64),
}

impl ValidationError {
    /// Name of the request field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EventsNotAllowed { .. } => "events",
            ValidationError::InvalidTargetUrl(_) => "target_url",
            ValidationError::ScopeMismatch { field, .. } => *field,
            ValidationError::MissingReference { field, .. } => *field,
            ValidationError::WriteOnce { field } => *field,
            ValidationError::UnknownOwner(_) => "owner_id",
        }
    }

    /// Structured details for API error bodies
    pub fn details(&self) -> serde_json::Value {
        match self {
            ValidationError::EventsNotAllowed { scope, invalid } => json!({
                "field": self.field(),
                "type": scope,
                "invalid_events": invalid,
                "allowed_events": events_for(*scope),
            }),
            ValidationError::ScopeMismatch { scope, field }
            | ValidationError::MissingReference { scope, field } => json!({
                "field": field,
                "type": scope,
            }),
            _ => json!({ "field": self.field() }),
        }
    }
}

/// Check that every event is legal for the scope.
///
/// The error lists the offending names in sorted order.
pub fn validate_events(scope: WebhookScope, events: &EventSet) -> Result<(), ValidationError> {
    let allowed = events_for(scope);
    let invalid: Vec<String> = events
        .iter()
        .filter(|name| !allowed.contains(*name))
        .map(str::to_string)
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::EventsNotAllowed { scope, invalid })
    }
}

pub fn validate_target_url(url: &str) -> Result<(), ValidationError> {
    let has_host = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .is_some_and(|rest| !rest.is_empty());
    if has_host {
        Ok(())
    } else {
        Err(ValidationError::InvalidTargetUrl(url.to_string()))
    }
}

/// Exactly one reference is set, and it is the one matching the scope
pub fn validate_scope_refs(
    scope: WebhookScope,
    project_id: Option<u64>,
    organization_id: Option<u64>,
) -> Result<(), ValidationError> {
    let (own, own_field, other, other_field) = match scope {
        WebhookScope::Project => (project_id, "project_id", organization_id, "organization_id"),
        WebhookScope::Organization => {
            (organization_id, "organization_id", project_id, "project_id")
        }
    };

    if other.is_some() {
        return Err(ValidationError::ScopeMismatch {
            scope,
            field: other_field,
        });
    }
    if own.is_none() {
        return Err(ValidationError::MissingReference {
            scope,
            field: own_field,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::all_events;

    #[test]
    fn test_every_catalog_subset_validates() {
        for scope in WebhookScope::ALL {
            let allowed = events_for(scope);
            assert!(validate_events(scope, &allowed.iter().copied().collect()).is_ok());
            assert!(validate_events(scope, &EventSet::new()).is_ok());
            for name in allowed.iter() {
                let single: EventSet = [*name].into_iter().collect();
                assert!(validate_events(scope, &single).is_ok(), "{} for {}", name, scope);
            }
        }
    }

    #[test]
    fn test_events_outside_project_scope_fail() {
        let project = events_for(WebhookScope::Project);
        for name in all_events().iter().filter(|name| !project.contains(**name)) {
            let single: EventSet = [*name].into_iter().collect();
            let err = validate_events(WebhookScope::Project, &single).unwrap_err();
            assert_eq!(
                err,
                ValidationError::EventsNotAllowed {
                    scope: WebhookScope::Project,
                    invalid: vec![name.to_string()],
                }
            );
        }

        let unknown = EventSet::parse_joined("not_an_event");
        assert!(validate_events(WebhookScope::Organization, &unknown).is_err());

        let padded: EventSet = [" comment_created"].into_iter().collect();
        assert_eq!(
            validate_events(WebhookScope::Project, &padded),
            Err(ValidationError::EventsNotAllowed {
                scope: WebhookScope::Project,
                invalid: vec![" comment_created".to_string()],
            })
        );
    }

    #[test]
    fn test_error_names_scope_and_offending_events() {
        let events = EventSet::parse_joined("task_created,project_deleted,membership_updated");
        let err = validate_events(WebhookScope::Project, &events).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Invalid events list for project webhook: membership_updated, project_deleted"
        );
        let details = err.details();
        assert_eq!(details["type"], "project");
        assert_eq!(
            details["invalid_events"],
            serde_json::json!(["membership_updated", "project_deleted"])
        );
    }

    #[test]
    fn test_target_url_scheme() {
        assert!(validate_target_url("https://example.com/hook").is_ok());
        assert!(validate_target_url("http://10.0.0.1:8080").is_ok());
        assert!(validate_target_url("ftp://example.com").is_err());
        assert!(validate_target_url("https://").is_err());
    }

    #[test]
    fn test_scope_refs() {
        assert!(validate_scope_refs(WebhookScope::Project, Some(1), None).is_ok());
        assert!(validate_scope_refs(WebhookScope::Organization, None, Some(2)).is_ok());
        assert_eq!(
            validate_scope_refs(WebhookScope::Project, Some(1), Some(2))
                .unwrap_err()
                .field(),
            "organization_id"
        );
        assert_eq!(
            validate_scope_refs(WebhookScope::Organization, Some(1), Some(2))
                .unwrap_err()
                .field(),
            "project_id"
        );
    }

    #[test]
    fn test_missing_reference_for_either_scope() {
        assert_eq!(
            validate_scope_refs(WebhookScope::Project, None, None),
            Err(ValidationError::MissingReference {
                scope: WebhookScope::Project,
                field: "project_id",
            })
        );

        let err = validate_scope_refs(WebhookScope::Organization, None, None).unwrap_err();
        assert_eq!(err.field(), "organization_id");
        assert_eq!(err.to_string(), "organization_id is required for a organization webhook");
        assert_eq!(err.details()["type"], "organization");
    }
}
