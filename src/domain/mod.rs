//! Domain layer - Core payment lifecycle models and rules
//!
//! This module contains the business rules of the payment core: exact amount
//! handling, intent validation, the connection state machine, attempt status
//! progression, and order records. It is independent of infrastructure
//! concerns like HTTP or storage.

pub mod amount;
pub mod attempt;
pub mod connection;
pub mod intent;
pub mod order;

pub use amount::TonAmount;
pub use attempt::{AttemptStatus, PaymentAttempt, TxRef};
pub use connection::{ConnectedWallet, ConnectionState};
pub use intent::PaymentIntent;
pub use order::{OrderRecord, OrderStatus};
