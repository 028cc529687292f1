//! External callback delivery client
//!
//! POSTs terminal payment payloads to the callback URL supplied at launch.
//! When a webhook secret is configured the payload is wrapped in an
//! HMAC-SHA256 signed envelope `{data, signature, timestamp}`; the switch is
//! the presence of the secret, never per-call logic. Delivery is best-effort:
//! failures are returned to the reporter, which logs them and moves on.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use crate::config::AppConfig;
use crate::shared::error::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

/// HTTP client for callback URLs
pub struct CallbackClient {
    client: reqwest::Client,
    webhook_secret: Option<String>,
}

impl CallbackClient {
    pub fn new(config: Arc<AppConfig>) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.reporting.callback_timeout_seconds))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            webhook_secret: config.reporting.webhook_secret.clone(),
        })
    }

    /// Deliver a terminal payload to the callback URL
    pub async fn deliver(&self, url: &str, payload: serde_json::Value) -> AppResult<()> {
        let body = match &self.webhook_secret {
            Some(secret) => Self::sign(payload, secret)?,
            None => payload,
        };

        debug!(url = %url, "Delivering callback");
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Http(format!("callback request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Http(format!(
                "callback returned status {}",
                response.status()
            )));
        }
        Ok(())
    }

    /// Wrap a payload in the signed envelope
    fn sign(mut data: serde_json::Value, secret: &str) -> AppResult<serde_json::Value> {
        let timestamp = Utc::now().timestamp();
        if let Some(object) = data.as_object_mut() {
            object.insert("timestamp".to_string(), serde_json::json!(timestamp));
        }

        let serialized = serde_json::to_string(&data)?;
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| AppError::Config(format!("invalid webhook secret: {}", e)))?;
        mac.update(serialized.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        Ok(serde_json::json!({
            "data": data,
            "signature": signature,
            "timestamp": timestamp,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_envelope_shape_and_signature() {
        let payload = serde_json::json!({
            "status": "success",
            "orderId": "ord-1",
            "txHash": "boc123",
        });
        let envelope = CallbackClient::sign(payload, "secret-key").unwrap();

        let data = envelope.get("data").unwrap();
        assert_eq!(data["status"], "success");
        assert_eq!(data["orderId"], "ord-1");
        assert!(data["timestamp"].is_i64());
        assert_eq!(envelope["timestamp"], data["timestamp"]);

        // Signature must be HMAC-SHA256 over the serialized data object
        let serialized = serde_json::to_string(data).unwrap();
        let mut mac = HmacSha256::new_from_slice(b"secret-key").unwrap();
        mac.update(serialized.as_bytes());
        let expected = hex::encode(mac.finalize().into_bytes());
        assert_eq!(envelope["signature"], serde_json::json!(expected));
    }

    #[test]
    fn test_unsigned_when_no_secret() {
        let config = Arc::new(AppConfig::default());
        let client = CallbackClient::new(config).unwrap();
        assert!(client.webhook_secret.is_none());
    }
}
