//! HTTP models - Infrastructure concerns
//!
//! Request and response structures for the backend order endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::order::OrderRecord;

/// Order creation request body
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrderRequest {
    /// Correlation id shared with the merchant system
    #[serde(rename = "orderId")]
    #[validate(length(min = 1, max = 128))]
    pub order_id: String,

    /// Amount in major units, e.g. "1.5"
    #[validate(length(min = 1, max = 64))]
    pub amount: String,

    /// Destination wallet address
    #[validate(length(min = 1, max = 128))]
    pub address: String,

    /// Display name for the purchased item
    #[serde(rename = "productName", default)]
    pub product_name: Option<String>,
}

/// Status update callback query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    #[serde(rename = "orderId")]
    pub order_id: String,
    pub status: String,
}

/// Order representation returned by the backend endpoints
#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    #[serde(rename = "orderId")]
    pub order_id: String,
    pub status: String,
    pub amount: String,
    pub address: String,
    #[serde(rename = "productName")]
    pub product_name: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(record: OrderRecord) -> Self {
        Self {
            order_id: record.order_id,
            status: record.status.label().to_string(),
            amount: record.amount.to_major_units(),
            address: record.address,
            product_name: record.product_name,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}
