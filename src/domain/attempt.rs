//! Payment attempt lifecycle
//!
//! One `PaymentAttempt` exists per user-initiated send. Status moves
//! monotonically through the lifecycle and a `Reported` attempt can never
//! re-enter an earlier state; illegal transitions are rejected, not ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::intent::PaymentIntent;
use crate::shared::error::{AppError, AppResult};

/// Opaque transaction reference returned on submission (e.g. a boc)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxRef(String);

impl TxRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TxRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Attempt status, ordered by lifecycle progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum AttemptStatus {
    Pending,
    Submitted { tx_ref: TxRef },
    Verified { tx_ref: TxRef },
    Failed { error_kind: String },
    Reported,
}

impl AttemptStatus {
    fn rank(&self) -> u8 {
        match self {
            AttemptStatus::Pending => 0,
            AttemptStatus::Submitted { .. } => 1,
            AttemptStatus::Verified { .. } => 2,
            AttemptStatus::Failed { .. } => 3,
            AttemptStatus::Reported => 4,
        }
    }

    /// Short label for structured logging
    pub fn label(&self) -> &'static str {
        match self {
            AttemptStatus::Pending => "pending",
            AttemptStatus::Submitted { .. } => "submitted",
            AttemptStatus::Verified { .. } => "verified",
            AttemptStatus::Failed { .. } => "failed",
            AttemptStatus::Reported => "reported",
        }
    }
}

/// A single user-initiated payment attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentAttempt {
    pub intent: PaymentIntent,
    pub status: AttemptStatus,
    pub created_at: DateTime<Utc>,
    pub reported_at: Option<DateTime<Utc>>,
}

impl PaymentAttempt {
    pub fn new(intent: PaymentIntent) -> Self {
        Self {
            intent,
            status: AttemptStatus::Pending,
            created_at: Utc::now(),
            reported_at: None,
        }
    }

    /// Advance the status; transitions must be strictly forward
    ///
    /// Legal transitions: Pending -> Submitted | Failed,
    /// Submitted -> Verified | Failed | Reported,
    /// Verified -> Failed | Reported, Failed -> Reported.
    pub fn advance(&mut self, next: AttemptStatus) -> AppResult<()> {
        let legal = match (&self.status, &next) {
            (AttemptStatus::Pending, AttemptStatus::Submitted { .. })
            | (AttemptStatus::Pending, AttemptStatus::Failed { .. })
            | (AttemptStatus::Submitted { .. }, AttemptStatus::Verified { .. })
            | (AttemptStatus::Submitted { .. }, AttemptStatus::Failed { .. })
            | (AttemptStatus::Submitted { .. }, AttemptStatus::Reported)
            | (AttemptStatus::Verified { .. }, AttemptStatus::Failed { .. })
            | (AttemptStatus::Verified { .. }, AttemptStatus::Reported)
            | (AttemptStatus::Failed { .. }, AttemptStatus::Reported) => true,
            _ => false,
        };
        if !legal || next.rank() <= self.status.rank() {
            return Err(AppError::Validation(format!(
                "illegal attempt transition: {} -> {}",
                self.status.label(),
                next.label()
            )));
        }

        crate::shared::logging::LoggingUtils::log_attempt_transition(
            &self.intent.order_id,
            self.status.label(),
            next.label(),
        );
        if matches!(next, AttemptStatus::Reported) {
            self.reported_at = Some(Utc::now());
        }
        self.status = next;
        Ok(())
    }

    /// The transaction reference, once submitted
    pub fn tx_ref(&self) -> Option<&TxRef> {
        match &self.status {
            AttemptStatus::Submitted { tx_ref } | AttemptStatus::Verified { tx_ref } => Some(tx_ref),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, AttemptStatus::Reported)
    }
}
