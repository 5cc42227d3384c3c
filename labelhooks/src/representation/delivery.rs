use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::WebhookDelivery;

/// Read-only view of a delivery record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DeliveryRepresentation {
    pub id: u64,
    pub webhook_id: u64,
    pub event: String,
    pub status_code: Option<u16>,
    pub redelivery: bool,
    pub delivered_at: DateTime<Utc>,
    pub changed_fields: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub request: serde_json::Value,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub response: serde_json::Value,
}

pub fn serialize_delivery(delivery: &WebhookDelivery) -> DeliveryRepresentation {
    DeliveryRepresentation {
        id: delivery.id,
        webhook_id: delivery.webhook_id,
        event: delivery.event.clone(),
        status_code: delivery.status_code,
        redelivery: delivery.redelivery,
        delivered_at: delivery.delivered_at,
        changed_fields: delivery.changed_fields.clone(),
        request: delivery.request.clone(),
        response: delivery.response.clone(),
    }
}

impl From<&WebhookDelivery> for DeliveryRepresentation {
    fn from(delivery: &WebhookDelivery) -> Self {
        serialize_delivery(delivery)
    }
}
