//! Application services
//!
//! Hosts the payment-flow stages and the order bookkeeping service. Each
//! service owns one stage of the attempt lifecycle and is shared across the
//! application behind an `Arc`.

pub mod connection_service;
pub mod order_service;
pub mod report_service;
pub mod submit_service;
pub mod verify_service;

pub use connection_service::ConnectionController;
pub use order_service::{OrderService, SharedOrderService};
pub use report_service::{ReportDisposition, ResultReporter};
pub use submit_service::TransactionSubmitter;
pub use verify_service::TransactionVerifier;
