//! Application layer
//!
//! Coordinates the domain model through services and use cases, and defines
//! the ports that infrastructure adapters implement.

pub mod ports;
pub mod services;
pub mod use_cases;

pub use services::{
    ConnectionController, OrderService, ReportDisposition, ResultReporter, SharedOrderService,
    TransactionSubmitter, TransactionVerifier,
};
pub use use_cases::ProcessPaymentUseCase;
