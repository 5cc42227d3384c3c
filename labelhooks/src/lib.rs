//! # Labelhooks
//!
//! Webhook management for a data-annotation platform. Webhooks are bound either
//! to a single project or to a whole organization, and each scope accepts its
//! own vocabulary of event names.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use labelhooks::prelude::*;
//!
//! # tokio_test::block_on(async {
//! let store = Arc::new(InMemoryWebhookStore::new());
//! let service = WebhookService::new(store, "http://localhost:3000");
//!
//! let payload: WebhookWritePayload = serde_json::from_value(serde_json::json!({
//!     "target_url": "https://hooks.example.com/annotations",
//!     "type": "project",
//!     "project_id": 7,
//!     "events": "issue_resolved,comment_created"
//! }))
//! .unwrap();
//!
//! let webhook = service.create(payload).await.unwrap();
//! assert_eq!(webhook.events.to_joined(), "comment_created,issue_resolved");
//! # });
//! ```
//!
//! ## Architecture
//!
//! - **catalog**: the fixed registry of legal event names per scope
//! - **models**: stored records (webhooks, deliveries, users, labeling data)
//! - **representation**: validation and scope-aware external views
//! - **storage**: async persistence interface plus an in-memory store
//! - **service**: validate, persist and render in one call
//!
//! The HTTP surface lives in the separate `labelhooks-server` crate.

pub mod catalog;
pub mod config;
pub mod logging;
pub mod models;
pub mod representation;
pub mod service;
pub mod storage;

/// The prelude re-exports commonly used types for convenience
pub mod prelude {
    pub use crate::catalog::{WebhookScope, all_events, events_for, is_known_event};
    pub use crate::config::{ConfigLoader, LabelhooksConfig, LogFormat, LogLevel};
    pub use crate::models::{
        BasicUser, ContentType, EventSet, LabelingData, NewDelivery, SortingMethod, Webhook,
        WebhookDelivery,
    };
    pub use crate::representation::{
        DeliveryRepresentation, ValidationError, WebhookPatch, WebhookRepresentation,
        WebhookWritePayload, validate_events,
    };
    pub use crate::service::WebhookService;
    pub use crate::storage::{InMemoryWebhookStore, StorageError, WebhookFilter, WebhookStore};
    pub use crate::{Result, WebhookError};
}

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error type for webhook operations
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The request was rejected before anything was persisted
    #[error(transparent)]
    Validation(#[from] representation::ValidationError),

    /// Passed through unmodified from the store
    #[error(transparent)]
    Storage(#[from] storage::StorageError),

    /// No record with the given id
    #[error("{resource} with id '{id}' not found")]
    NotFound { resource: &'static str, id: u64 },
}

impl WebhookError {
    pub(crate) fn webhook_not_found(id: u64) -> Self {
        WebhookError::NotFound {
            resource: "Webhook",
            id,
        }
    }

    pub(crate) fn delivery_not_found(id: u64) -> Self {
        WebhookError::NotFound {
            resource: "Webhook delivery",
            id,
        }
    }
}

/// Result type for webhook operations
pub type Result<T> = std::result::Result<T, WebhookError>;
