//! HTTP infrastructure

pub mod handlers;
pub mod models;
pub mod routes;
pub mod server;

pub use server::HttpServer;
