//! Order records held by the backend store
//!
//! Mirrors the merchant-side view of a payment: created pending when the
//! order is placed, moved to success/failed by the callback endpoint or the
//! verification stage's caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::amount::TonAmount;

/// Order completion status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Success,
    Failed,
}

impl OrderStatus {
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Success => "success",
            OrderStatus::Failed => "failed",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "success" => Ok(OrderStatus::Success),
            "failed" => Ok(OrderStatus::Failed),
            _ => Err(format!("unsupported order status: {}", s)),
        }
    }
}

/// Order record persisted in the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub status: OrderStatus,
    pub amount: TonAmount,
    pub address: String,
    pub product_name: String,
    pub created_at: DateTime<Utc>,
}

impl OrderRecord {
    pub fn new(order_id: String, amount: TonAmount, address: String, product_name: String) -> Self {
        Self {
            order_id,
            status: OrderStatus::Pending,
            amount,
            address,
            product_name,
            created_at: Utc::now(),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.status, OrderStatus::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!("success".parse::<OrderStatus>().unwrap(), OrderStatus::Success);
        assert_eq!("FAILED".parse::<OrderStatus>().unwrap(), OrderStatus::Failed);
        assert!("done".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_new_record_is_pending() {
        let record = OrderRecord::new(
            "ord-1".to_string(),
            TonAmount::from_major_units("2").unwrap(),
            "EQAbc".to_string(),
            "Widget".to_string(),
        );
        assert_eq!(record.status, OrderStatus::Pending);
        assert!(!record.is_completed());
    }
}
