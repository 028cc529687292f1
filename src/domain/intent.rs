//! Payment intent and launch-parameter parsing
//!
//! A `PaymentIntent` is the validated, immutable description of a requested
//! payment, produced once at startup from the deep-link query string or the
//! platform start parameter. Validation is all-or-nothing: a partially valid
//! parameter set never yields an intent.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::amount::TonAmount;
use crate::shared::error::RejectionReason;

/// Default product name when the launch parameters omit one
pub const DEFAULT_PRODUCT_NAME: &str = "Product";

/// Validated, immutable payment parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Opaque order identifier, unique per payment attempt
    pub order_id: String,

    /// Destination chain address
    pub destination_address: String,

    /// Requested amount in major units, held exactly
    pub amount: TonAmount,

    /// Display name of the purchased product
    pub product_name: String,

    /// Opaque pass-through display value
    pub epin: Option<String>,

    /// External callback URL supplied at launch
    pub callback_url: Option<String>,
}

impl PaymentIntent {
    /// Build an intent from extracted key-value launch parameters
    ///
    /// Required: `address`, `orderId`, `amount` (positive decimal). Optional:
    /// `productName`, `epin`, `callback_url`.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, RejectionReason> {
        let required = |key: &str| -> Result<String, RejectionReason> {
            match params.get(key).map(|v| v.trim()) {
                Some(v) if !v.is_empty() => Ok(v.to_string()),
                _ => Err(RejectionReason::MissingOrInvalidField(key.to_string())),
            }
        };

        let destination_address = required("address")?;
        let order_id = required("orderId")?;
        let amount = TonAmount::from_major_units(&required("amount")?)
            .map_err(|_| RejectionReason::MissingOrInvalidField("amount".to_string()))?;

        let optional = |key: &str| {
            params
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(|v| v.to_string())
        };

        Ok(Self {
            order_id,
            destination_address,
            amount,
            product_name: optional("productName").unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_string()),
            epin: optional("epin"),
            callback_url: optional("callback_url"),
        })
    }

    /// Build an intent from the JSON-encoded platform start parameter
    ///
    /// Malformed JSON converts to `RejectionReason::ParseError`, never a panic.
    pub fn from_start_param(raw: &str) -> Result<Self, RejectionReason> {
        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| RejectionReason::ParseError(e.to_string()))?;
        let object = value
            .as_object()
            .ok_or_else(|| RejectionReason::ParseError("expected a JSON object".to_string()))?;

        let mut params = HashMap::new();
        for (key, val) in object {
            let text = match val {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                _ => continue,
            };
            params.insert(key.clone(), text);
        }
        Self::from_params(&params)
    }
}
