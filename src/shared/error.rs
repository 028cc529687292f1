//! Error handling module
//!
//! Centralized error types for the payment core. Stage-specific errors
//! (parsing, connection, submission, verification) are separate enums so
//! callers can surface which stage failed; `AppError` is the top-level type
//! used by the configuration layer and the HTTP surface.

use thiserror::Error;

/// Application error types
#[derive(Error, Debug, Clone)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get HTTP status code for this error
    pub fn http_status_code(&self) -> warp::http::StatusCode {
        match self {
            AppError::Validation(_) => warp::http::StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => warp::http::StatusCode::NOT_FOUND,
            AppError::RateLimit => warp::http::StatusCode::TOO_MANY_REQUESTS,
            _ => warp::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Application result type
pub type AppResult<T> = Result<T, AppError>;

impl warp::reject::Reject for AppError {}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Rejection of launch parameters; terminal, no retry path
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    #[error("missing or invalid field: {0}")]
    MissingOrInvalidField(String),

    #[error("malformed launch parameters: {0}")]
    ParseError(String),
}

/// Exact decimal amount conversion failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("malformed decimal amount: {0}")]
    Malformed(String),

    #[error("amount must be positive")]
    NonPositive,

    #[error("fractional part exceeds {0} digits")]
    PrecisionLoss(u32),

    #[error("amount out of range")]
    Overflow,
}

/// Wallet handshake failures; recoverable, the user may retry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("wallet connection timed out")]
    Timeout,

    #[error("wallet connection rejected: {0}")]
    Rejected(String),

    #[error("connection attempt superseded")]
    Superseded,

    #[error("wallet SDK error: {0}")]
    SdkError(String),
}

/// Transfer submission failures; the transaction was not sent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("transaction rejected by user")]
    Rejected,

    #[error("wallet SDK error: {0}")]
    SdkError(String),

    #[error("submission already in flight for this order")]
    AlreadyInFlight,
}

/// Post-submission verification failures
///
/// The transfer may have landed on-chain even when verification fails, which
/// is why every variant names the specific check that did not pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("order record does not match intent: {0}")]
    OrderMismatch(String),

    #[error("order already completed")]
    AlreadyCompleted,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("on-chain amount mismatch: expected {expected} nanotons, found {actual}")]
    AmountMismatch { expected: u128, actual: u128 },

    #[error("on-chain destination address mismatch")]
    AddressMismatch,

    #[error("chain query failed: {0}")]
    QueryFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            AppError::Validation("bad".into()).http_status_code(),
            warp::http::StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("order".into()).http_status_code(),
            warp::http::StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Internal("boom".into()).http_status_code(),
            warp::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_verification_errors_are_specific() {
        let e = VerificationError::AmountMismatch { expected: 1_500_000_000, actual: 1_000_000_000 };
        assert!(e.to_string().contains("1500000000"));
        assert_ne!(
            VerificationError::NotFound("order record".into()).to_string(),
            VerificationError::NotFound("outgoing message".into()).to_string()
        );
    }
}
