//! Ports to external collaborators
//!
//! The wallet-connection SDK, the chain query client, and the host chrome are
//! opaque capabilities behind these traits. Production adapters live in the
//! infrastructure layer; tests substitute mocks.

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::watch;

use crate::domain::attempt::TxRef;
use crate::domain::connection::ConnectedWallet;
use crate::shared::error::{AppError, ConnectionError, SubmitError, VerificationError};

/// Transfer request handed to the wallet SDK for signing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferRequest {
    /// Destination chain address
    pub destination: String,

    /// Value in nanotons
    pub amount_nano: u128,

    /// Unix-seconds deadline after which the transfer is invalid
    pub valid_until: i64,
}

/// Wallet-connection SDK port
///
/// Operations are asynchronous, possibly slow, possibly failing. Connection
/// completion is observed through the status subscription, not polled.
#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// Open the wallet connection flow. Returns once the flow has been
    /// requested; the wallet appearing (or not) is observed on
    /// [`status_changes`](Self::status_changes).
    async fn open_connect_flow(&self) -> Result<(), ConnectionError>;

    /// Attempt a silent session restore from a prior connection.
    async fn restore_session(&self) -> Result<(), ConnectionError>;

    /// Subscription to wallet status changes; carries `Some` once a wallet
    /// is connected and `None` after disconnect.
    fn status_changes(&self) -> watch::Receiver<Option<ConnectedWallet>>;

    /// Drop the wallet session. Safe to call when not connected.
    async fn disconnect(&self);

    /// Request a signed transfer. May prompt the user inside their wallet
    /// and block until they approve or reject; a single awaitable step with
    /// no intermediate states exposed.
    async fn send_transaction(&self, request: &TransferRequest) -> Result<TxRef, SubmitError>;
}

/// An outgoing message of an on-chain transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub destination: String,
    pub value_nano: u128,
}

/// Read-only chain query port used by the verification stage
#[async_trait]
pub trait ChainQuery: Send + Sync {
    /// Outgoing messages of the account's recent transactions, newest first.
    /// `tx_ref` is an opaque hint the adapter may use to narrow the lookup.
    async fn outgoing_messages(
        &self,
        account: &str,
        tx_ref: &TxRef,
    ) -> Result<Vec<OutgoingMessage>, VerificationError>;
}

/// Host mini-app chrome port: the outbound data channel and close signal
#[async_trait]
pub trait ChromeSink: Send + Sync {
    /// Send a JSON payload over the platform's data channel. Best-effort;
    /// failures are logged by the caller, never escalated.
    async fn send_data(&self, payload: serde_json::Value) -> Result<(), AppError>;

    /// Ask the host platform to close the app.
    async fn close(&self);
}
