//! Event catalog: the fixed vocabulary of webhook events per scope.
//!
//! The two sets are a versioned constant. Removing a name is a compatibility
//! break because stored webhooks may still reference it.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// Events a project-level webhook may subscribe to.
pub const PROJECT_EVENTS: &[&str] = &[
    "comment_created",
    "comment_deleted",
    "comment_updated",
    "issue_created",
    "issue_deleted",
    "issue_resolved",
    "issue_updated",
    "job_updated",
    "project_updated",
    "task_created",
    "task_deleted",
    "task_updated",
];

/// Events only an organization-level webhook may subscribe to.
const ORGANIZATION_ONLY_EVENTS: &[&str] = &[
    "invitation_created",
    "invitation_deleted",
    "membership_deleted",
    "membership_updated",
    "organization_updated",
    "project_created",
    "project_deleted",
];

lazy_static! {
    static ref PROJECT_SET: BTreeSet<&'static str> = PROJECT_EVENTS.iter().copied().collect();
    static ref ORGANIZATION_SET: BTreeSet<&'static str> = PROJECT_EVENTS
        .iter()
        .chain(ORGANIZATION_ONLY_EVENTS)
        .copied()
        .collect();
    static ref ALL_EVENTS: BTreeSet<&'static str> =
        PROJECT_SET.union(&ORGANIZATION_SET).copied().collect();
}

/// Whether a webhook is bound to a single project or to an entire organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum WebhookScope {
    Project,
    Organization,
}

impl WebhookScope {
    pub const ALL: [WebhookScope; 2] = [WebhookScope::Project, WebhookScope::Organization];

    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookScope::Project => "project",
            WebhookScope::Organization => "organization",
        }
    }
}

impl fmt::Display for WebhookScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WebhookScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project" => Ok(WebhookScope::Project),
            "organization" => Ok(WebhookScope::Organization),
            other => Err(format!(
                "\"{}\" is not a valid webhook type. Valid types: project, organization",
                other
            )),
        }
    }
}

/// Event names legal for webhooks of the given scope
pub fn events_for(scope: WebhookScope) -> &'static BTreeSet<&'static str> {
    match scope {
        WebhookScope::Project => &PROJECT_SET,
        WebhookScope::Organization => &ORGANIZATION_SET,
    }
}

/// Every event name known to the platform, regardless of scope
pub fn all_events() -> &'static BTreeSet<&'static str> {
    &ALL_EVENTS
}

pub fn is_known_event(name: &str) -> bool {
    ALL_EVENTS.contains(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_events_are_subset_of_organization_events() {
        let project = events_for(WebhookScope::Project);
        let organization = events_for(WebhookScope::Organization);
        assert!(project.is_subset(organization));
        assert!(organization.len() > project.len());
    }

    #[test]
    fn test_organization_only_events() {
        let project = events_for(WebhookScope::Project);
        for name in ["project_created", "project_deleted", "membership_updated"] {
            assert!(!project.contains(name), "{} leaked into project scope", name);
            assert!(events_for(WebhookScope::Organization).contains(name));
        }
    }

    #[test]
    fn test_all_events_is_union() {
        assert_eq!(
            all_events().len(),
            PROJECT_EVENTS.len() + ORGANIZATION_ONLY_EVENTS.len()
        );
        assert!(is_known_event("issue_resolved"));
        assert!(!is_known_event("issue_reopened"));
    }

    #[test]
    fn test_scope_wire_names() {
        assert_eq!(
            serde_json::to_value(WebhookScope::Organization).unwrap(),
            serde_json::json!("organization")
        );
        assert_eq!("project".parse::<WebhookScope>(), Ok(WebhookScope::Project));
        assert!("team".parse::<WebhookScope>().is_err());
    }
}
