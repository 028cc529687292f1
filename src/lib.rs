//! tonpay - payment core for a TON mini-app checkout
//!
//! This library drives a payment attempt from a validated intent through
//! wallet connection, transfer submission, optional on-chain verification,
//! and exactly-once terminal reporting. It also ships the backend order
//! surface the mini-app talks to.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod middleware;
pub mod shared;

pub use config::AppConfig;
pub use infrastructure::http::HttpServer;
pub use shared::error::{AppError, AppResult};

/// Application result type
pub type Result<T> = std::result::Result<T, shared::error::AppError>;
