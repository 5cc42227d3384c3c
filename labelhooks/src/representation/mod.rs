//! Validation and external representations of webhook records

pub mod delivery;
pub mod read;
pub mod validation;
pub mod write;

pub use delivery::{DeliveryRepresentation, serialize_delivery};
pub use read::{
    EventsRepresentation, ScopeBinding, WebhookRepresentation, serialize_events_catalog,
    serialize_for_read, webhook_url,
};
pub use validation::{ValidationError, validate_events};
pub use write::{WebhookPatch, WebhookWritePayload};
