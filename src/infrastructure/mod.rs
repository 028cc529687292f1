//! Infrastructure layer
//!
//! Adapters for external systems (wallet bridge, chain API, merchant
//! callback) plus the in-memory stores and the backend HTTP surface.

pub mod adapters;
pub mod http;
