//! Records held by the store

pub mod data;
pub mod delivery;
pub mod event_set;
pub mod user;
pub mod webhook;

pub use data::{LabelingData, SortingMethod};
pub use delivery::{NewDelivery, WebhookDelivery, latest_delivery};
pub use event_set::EventSet;
pub use user::BasicUser;
pub use webhook::{ContentType, NewWebhook, Webhook};
