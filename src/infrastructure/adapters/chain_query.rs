//! Chain query adapter for the toncenter HTTP API
//!
//! Resolves a submitted transfer to its outgoing messages by looking up the
//! transaction on the payer account. Queries are retried a bounded number of
//! times with a short backoff before the failure is surfaced.

use crate::{
    application::ports::{ChainQuery, OutgoingMessage},
    config::AppConfig,
    domain::attempt::TxRef,
    shared::error::{AppError, AppResult, VerificationError},
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Adapter for the toncenter transaction API
pub struct ToncenterAdapter {
    config: Arc<AppConfig>,
    client: reqwest::Client,
}

impl ToncenterAdapter {
    /// Create a new toncenter adapter
    pub fn new(config: Arc<AppConfig>) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.verification.query_timeout_seconds))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    async fn fetch_transactions(
        &self,
        account: &str,
        tx_ref: &TxRef,
    ) -> Result<serde_json::Value, String> {
        let url = format!("{}/getTransactions", self.config.verification.chain_api_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("address", account),
                ("hash", tx_ref.as_str()),
                ("limit", "1"),
            ])
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("HTTP error: {}", response.status()));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))
    }

    fn parse_outgoing_messages(body: &serde_json::Value) -> Result<Vec<OutgoingMessage>, String> {
        if body.get("ok").and_then(|v| v.as_bool()) == Some(false) {
            let error = body.get("error").cloned().unwrap_or_default();
            return Err(format!("API error: {}", error));
        }

        let transactions = body
            .get("result")
            .and_then(|v| v.as_array())
            .ok_or_else(|| "Invalid API response".to_string())?;

        let mut messages = Vec::new();
        for tx in transactions {
            let out_msgs = tx
                .get("out_msgs")
                .and_then(|v| v.as_array())
                .ok_or_else(|| "Transaction missing out_msgs".to_string())?;

            for msg in out_msgs {
                let destination = msg
                    .get("destination")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                // toncenter reports nanoton values as decimal strings
                let value_nano = match msg.get("value") {
                    Some(serde_json::Value::String(s)) => s
                        .parse::<u128>()
                        .map_err(|e| format!("Invalid message value: {}", e))?,
                    Some(serde_json::Value::Number(n)) => {
                        n.as_u64().map(u128::from).unwrap_or_default()
                    }
                    _ => 0,
                };
                messages.push(OutgoingMessage {
                    destination,
                    value_nano,
                });
            }
        }
        Ok(messages)
    }
}

#[async_trait]
impl ChainQuery for ToncenterAdapter {
    async fn outgoing_messages(
        &self,
        account: &str,
        tx_ref: &TxRef,
    ) -> Result<Vec<OutgoingMessage>, VerificationError> {
        let max_retries = self.config.verification.max_retries;
        let mut last_error = None;

        for attempt in 0..=max_retries {
            match self.fetch_transactions(account, tx_ref).await {
                Ok(body) => match Self::parse_outgoing_messages(&body) {
                    Ok(messages) => return Ok(messages),
                    Err(e) => last_error = Some(e),
                },
                Err(e) => last_error = Some(e),
            }

            if attempt < max_retries {
                info!(
                    "Chain query failed, retrying... (attempt {}/{})",
                    attempt + 1,
                    max_retries + 1
                );
                tokio::time::sleep(Duration::from_millis(100 * (attempt + 1) as u64)).await;
            }
        }

        Err(VerificationError::QueryFailed(format!(
            "chain query failed after {} attempts: {:?}",
            max_retries + 1,
            last_error
        )))
    }
}
