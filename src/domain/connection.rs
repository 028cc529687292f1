//! Wallet connection state machine
//!
//! One instance per app session, mutated only by the connection controller.
//! At most one connection attempt is in flight at any time; a new connect
//! request while `Connecting` either joins the attempt or supersedes it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A successfully connected wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedWallet {
    /// Account address reported by the wallet
    pub account_address: String,

    /// Opaque session token, when the SDK provides one
    pub session_token: Option<String>,
}

/// Connection lifecycle state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum ConnectionState {
    Disconnected,
    Connecting {
        started_at: DateTime<Utc>,
        /// Attempt generation; stale results from superseded attempts are
        /// discarded by comparing against this
        attempt: u64,
        deadline: DateTime<Utc>,
    },
    Connected(ConnectedWallet),
    Failed {
        reason: String,
        at: DateTime<Utc>,
    },
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected(_))
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self, ConnectionState::Connecting { .. })
    }

    /// The connected wallet, if any
    pub fn connected(&self) -> Option<&ConnectedWallet> {
        match self {
            ConnectionState::Connected(wallet) => Some(wallet),
            _ => None,
        }
    }

    /// Short label for structured logging
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting { .. } => "connecting",
            ConnectionState::Connected(_) => "connected",
            ConnectionState::Failed { .. } => "failed",
        }
    }
}

impl Default for ConnectionState {
    fn default() -> Self {
        ConnectionState::Disconnected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let wallet = ConnectedWallet {
            account_address: "EQAbc".to_string(),
            session_token: None,
        };
        let state = ConnectionState::Connected(wallet.clone());
        assert!(state.is_connected());
        assert_eq!(state.connected(), Some(&wallet));
        assert_eq!(state.label(), "connected");

        assert!(!ConnectionState::Disconnected.is_connected());
        assert_eq!(ConnectionState::default().label(), "disconnected");
    }
}
