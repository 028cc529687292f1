//! On-chain transaction verification
//!
//! Policy-gated stage that re-queries the chain after a settle delay and
//! confirms the submitted transfer matches the intent. Every failure names
//! the specific check that did not pass; a verification failure after a
//! successful submit means the transfer may still have landed on-chain, and
//! callers surface that distinctly from a clean submit failure.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::application::ports::ChainQuery;
use crate::config::AppConfig;
use crate::domain::attempt::TxRef;
use crate::domain::intent::PaymentIntent;
use crate::infrastructure::adapters::order_store::OrderStore;
use crate::shared::error::VerificationError;

/// Service verifying submitted transfers against the chain
pub struct TransactionVerifier {
    config: Arc<AppConfig>,
    chain: Arc<dyn ChainQuery>,
    orders: OrderStore,
}

impl TransactionVerifier {
    pub fn new(config: Arc<AppConfig>, chain: Arc<dyn ChainQuery>, orders: OrderStore) -> Self {
        Self { config, chain, orders }
    }

    /// Whether verification is enabled by policy
    pub fn is_enabled(&self) -> bool {
        self.config.verification.enabled
    }

    /// Verify the submitted transfer
    ///
    /// Checks the order record preconditions, waits the configured settle
    /// delay, then locates the outgoing on-chain message whose destination
    /// matches the intent (case-insensitive) and whose value equals the
    /// nanoton amount.
    pub async fn verify(
        &self,
        tx_ref: &TxRef,
        intent: &PaymentIntent,
        payer_address: &str,
    ) -> Result<(), VerificationError> {
        let record = self
            .orders
            .get(&intent.order_id)
            .await
            .map_err(|e| VerificationError::QueryFailed(e.to_string()))?
            .ok_or_else(|| VerificationError::NotFound("order record".to_string()))?;

        if record.is_completed() {
            return Err(VerificationError::AlreadyCompleted);
        }
        if record.amount != intent.amount {
            return Err(VerificationError::OrderMismatch(format!(
                "amount {} != {}",
                record.amount, intent.amount
            )));
        }
        if !record.address.eq_ignore_ascii_case(&intent.destination_address) {
            return Err(VerificationError::AddressMismatch);
        }

        let settle = Duration::from_secs(self.config.verification.settle_delay_seconds);
        if !settle.is_zero() {
            debug!(
                order_id = %intent.order_id,
                settle_seconds = settle.as_secs(),
                "Waiting for chain propagation"
            );
            tokio::time::sleep(settle).await;
        }

        let messages = self.chain.outgoing_messages(payer_address, tx_ref).await?;
        let expected = intent.amount.as_nano();

        let mut seen_value: Option<u128> = None;
        for message in &messages {
            if message.destination.eq_ignore_ascii_case(&intent.destination_address) {
                if message.value_nano == expected {
                    info!(
                        order_id = %intent.order_id,
                        tx_ref = %tx_ref,
                        "On-chain transfer verified"
                    );
                    return Ok(());
                }
                seen_value = Some(message.value_nano);
            }
        }

        match seen_value {
            Some(actual) => {
                warn!(order_id = %intent.order_id, "Outgoing message found with wrong value");
                Err(VerificationError::AmountMismatch { expected, actual })
            }
            None => {
                warn!(order_id = %intent.order_id, "No outgoing message to the destination");
                Err(VerificationError::NotFound("outgoing message".to_string()))
            }
        }
    }
}
