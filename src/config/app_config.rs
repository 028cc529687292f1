//! Application configuration structures
//!
//! This module contains the main configuration structures for the payment
//! core: connection policy, transfer policy, verification policy, reporting
//! policy, and the backend HTTP surface.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use validator::Validate;

/// Server configuration for the backend surface
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    /// Server address to bind to
    pub bind_address: IpAddr,

    /// Server port
    #[validate(range(min = 1, max = 65535))]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".parse().unwrap_or(IpAddr::from([127, 0, 0, 1])),
            port: 8080,
        }
    }
}

/// Wallet connection policy
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConnectionConfig {
    /// Handshake timeout in seconds
    #[validate(range(min = 1, max = 300))]
    pub timeout_seconds: u64,

    /// Timeout for the silent restore attempt in seconds
    #[validate(range(min = 1, max = 120))]
    pub restore_timeout_seconds: u64,

    /// Freshness TTL of the persisted connection hint in seconds
    #[validate(range(min = 60, max = 86400))]
    pub hint_ttl_seconds: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            restore_timeout_seconds: 10,
            hint_ttl_seconds: 3600,
        }
    }
}

/// Transfer construction policy
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TransferConfig {
    /// Transfer validity window in seconds
    #[validate(range(min = 60, max = 3600))]
    pub validity_seconds: u64,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self { validity_seconds: 600 }
    }
}

/// On-chain verification policy
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerificationConfig {
    /// Verify submitted transfers against the chain
    pub enabled: bool,

    /// Wait before re-querying the chain, to allow propagation
    #[validate(range(min = 0, max = 120))]
    pub settle_delay_seconds: u64,

    /// Chain query API base URL
    #[validate(url)]
    pub chain_api_url: String,

    /// Chain query timeout in seconds
    #[validate(range(min = 1, max = 300))]
    pub query_timeout_seconds: u64,

    /// Maximum chain query retry attempts
    #[validate(range(min = 0, max = 10))]
    pub max_retries: u32,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            settle_delay_seconds: 3,
            chain_api_url: "https://toncenter.com/api/v2".to_string(),
            query_timeout_seconds: 15,
            max_retries: 2,
        }
    }
}

/// Success criterion for closing the app and reporting success
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuccessCriterion {
    /// Trust the wallet SDK acknowledgement
    Submitted,
    /// Require on-chain verification to pass
    Verified,
}

/// Terminal result reporting policy
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReportingConfig {
    /// What counts as success for the terminal report
    pub success_on: SuccessCriterion,

    /// Delay before closing the app after a success report, in seconds
    #[validate(range(min = 0, max = 60))]
    pub close_delay_seconds: u64,

    /// Webhook POST timeout in seconds
    #[validate(range(min = 1, max = 120))]
    pub callback_timeout_seconds: u64,

    /// When set, callback payloads are wrapped in an HMAC-SHA256 signed
    /// envelope; absent means plain JSON
    pub webhook_secret: Option<String>,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            success_on: SuccessCriterion::Submitted,
            close_delay_seconds: 2,
            callback_timeout_seconds: 10,
            webhook_secret: None,
        }
    }
}

/// Rate limiting configuration for the backend surface
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    pub enabled: bool,

    /// Requests per minute
    #[validate(range(min = 1, max = 10000))]
    pub requests_per_minute: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_minute: 120,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoggingConfig {
    /// Log level
    #[validate(length(min = 1))]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

/// Top-level application configuration
///
/// Every section is serde-defaulted so a partial `Conf` file is accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub connection: ConnectionConfig,
    pub transfer: TransferConfig,
    pub verification: VerificationConfig,
    pub reporting: ReportingConfig,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from the `Conf` file and `TONPAY__` environment
    /// overrides
    pub fn load() -> crate::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("Conf").required(false))
            .add_source(config::Environment::with_prefix("TONPAY").separator("__"))
            .build()
            .map_err(|e| crate::shared::error::AppError::Config(format!("Failed to build configuration: {}", e)))?;

        let loaded: AppConfig = config
            .try_deserialize()
            .map_err(|e| crate::shared::error::AppError::Config(format!("Failed to deserialize configuration: {}", e)))?;

        loaded
            .validate_config()
            .map_err(|e| crate::shared::error::AppError::Validation(format!("Configuration validation failed: {}", e)))?;

        Ok(loaded)
    }

    /// Validate the entire configuration
    pub fn validate_config(&self) -> Result<(), validator::ValidationErrors> {
        self.server.validate()?;
        self.connection.validate()?;
        self.transfer.validate()?;
        self.verification.validate()?;
        self.reporting.validate()?;
        self.rate_limit.validate()?;
        self.logging.validate()?;

        // Reporting success on verification requires the verification stage
        if self.reporting.success_on == SuccessCriterion::Verified && !self.verification.enabled {
            let mut errors = validator::ValidationErrors::new();
            errors.add(
                "reporting",
                validator::ValidationError::new("success_on_verified_requires_verification"),
            );
            return Err(errors);
        }
        Ok(())
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate_config().is_ok());
        assert_eq!(config.connection.timeout_seconds, 30);
        assert_eq!(config.transfer.validity_seconds, 600);
        assert_eq!(config.verification.settle_delay_seconds, 3);
        assert_eq!(config.reporting.close_delay_seconds, 2);
        assert_eq!(config.reporting.success_on, SuccessCriterion::Submitted);
        assert!(config.reporting.webhook_secret.is_none());
        assert!(!config.verification.enabled);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = AppConfig::default();
        config.connection.timeout_seconds = 0;
        assert!(config.validate_config().is_err());

        let mut config = AppConfig::default();
        config.verification.chain_api_url = "not a url".to_string();
        assert!(config.validate_config().is_err());
    }

    #[test]
    fn test_verified_criterion_requires_verification() {
        let mut config = AppConfig::default();
        config.reporting.success_on = SuccessCriterion::Verified;
        assert!(config.validate_config().is_err());

        config.verification.enabled = true;
        assert!(config.validate_config().is_ok());
    }

    #[test]
    fn test_server_address() {
        let config = AppConfig::default();
        assert_eq!(config.server_address(), "127.0.0.1:8080");
    }
}
