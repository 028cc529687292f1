//! Infrastructure adapters
//!
//! Concrete implementations of the application ports plus the in-memory
//! stores and the outbound callback client.

pub mod callback_client;
pub mod chain_query;
pub mod order_store;
pub mod session_store;

pub use callback_client::CallbackClient;
pub use chain_query::ToncenterAdapter;
pub use order_store::OrderStore;
pub use session_store::{SessionHint, SessionStore};
