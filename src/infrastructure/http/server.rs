//! HTTP server for the backend order surface
//!
//! Serves the order endpoints the mini-app depends on. TLS, compression,
//! and CORS are left to a reverse proxy in front of this process.

use crate::{
    application::services::{OrderService, SharedOrderService},
    config::AppConfig,
    infrastructure::adapters::OrderStore,
    infrastructure::http::routes::PaymentRoutes,
    middleware::RateLimitMiddleware,
    shared::error::{AppError, AppResult},
    shared::metrics::MetricsUtils,
};
use std::sync::Arc;
use tracing::{info, instrument};
use warp::{Filter, Reply};

pub struct HttpServer {
    config: AppConfig,
    order_service: SharedOrderService,
    metrics: Arc<MetricsUtils>,
    rate_limit: Arc<RateLimitMiddleware>,
}

impl HttpServer {
    pub fn new(config: AppConfig) -> Self {
        let order_service = Arc::new(OrderService::new(OrderStore::new()));
        let metrics = Arc::new(MetricsUtils::new());
        let rate_limit = Arc::new(RateLimitMiddleware::new(&config));

        Self {
            config,
            order_service,
            metrics,
            rate_limit,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run the HTTP server
    #[instrument(skip(self))]
    pub async fn run(self) -> AppResult<()> {
        let addr = self.config.server_address();
        let addr: std::net::SocketAddr = addr
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid server address: {}", e)))?;

        let routes = self.create_routes();

        info!("Starting HTTP server on {}", addr);
        warp::serve(routes).run(addr).await;

        Ok(())
    }

    fn create_routes(self) -> impl Filter<Extract = impl Reply, Error = warp::Rejection> + Clone {
        PaymentRoutes::create_routes(self.order_service, self.metrics, self.rate_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_routes() -> impl Filter<Extract = impl Reply, Error = warp::Rejection> + Clone {
        let mut config = AppConfig::default();
        config.rate_limit.enabled = false;
        HttpServer::new(config).create_routes()
    }

    #[tokio::test]
    async fn test_create_then_fetch_order() {
        let routes = test_routes();

        let created = warp::test::request()
            .method("POST")
            .path("/payments")
            .json(&serde_json::json!({
                "orderId": "ord-1",
                "amount": "1.5",
                "address": "EQAbc",
                "productName": "Widget",
            }))
            .reply(&routes)
            .await;
        assert_eq!(created.status(), 201);

        let fetched = warp::test::request()
            .method("GET")
            .path("/payments/ord-1")
            .reply(&routes)
            .await;
        assert_eq!(fetched.status(), 200);

        let body: serde_json::Value = serde_json::from_slice(fetched.body()).unwrap();
        assert_eq!(body["orderId"], "ord-1");
        assert_eq!(body["status"], "pending");
        assert_eq!(body["amount"], "1.5");
    }

    #[tokio::test]
    async fn test_duplicate_order_rejected() {
        let routes = test_routes();
        let payload = serde_json::json!({
            "orderId": "ord-1",
            "amount": "2",
            "address": "EQAbc",
        });

        let first = warp::test::request()
            .method("POST")
            .path("/payments")
            .json(&payload)
            .reply(&routes)
            .await;
        assert_eq!(first.status(), 201);

        let second = warp::test::request()
            .method("POST")
            .path("/payments")
            .json(&payload)
            .reply(&routes)
            .await;
        assert_eq!(second.status(), 400);
    }

    #[tokio::test]
    async fn test_callback_updates_status() {
        let routes = test_routes();

        warp::test::request()
            .method("POST")
            .path("/payments")
            .json(&serde_json::json!({
                "orderId": "ord-1",
                "amount": "2",
                "address": "EQAbc",
            }))
            .reply(&routes)
            .await;

        let callback = warp::test::request()
            .method("GET")
            .path("/payments/callback?orderId=ord-1&status=success")
            .reply(&routes)
            .await;
        assert_eq!(callback.status(), 200);

        let body: serde_json::Value = serde_json::from_slice(callback.body()).unwrap();
        assert_eq!(body["status"], "success");
    }

    #[tokio::test]
    async fn test_callback_for_unknown_order_is_bad_request() {
        let routes = test_routes();

        let callback = warp::test::request()
            .method("GET")
            .path("/payments/callback?orderId=nope&status=failed")
            .reply(&routes)
            .await;
        assert_eq!(callback.status(), 400);
    }

    #[tokio::test]
    async fn test_callback_with_bad_status_is_bad_request() {
        let routes = test_routes();

        warp::test::request()
            .method("POST")
            .path("/payments")
            .json(&serde_json::json!({
                "orderId": "ord-1",
                "amount": "2",
                "address": "EQAbc",
            }))
            .reply(&routes)
            .await;

        let callback = warp::test::request()
            .method("GET")
            .path("/payments/callback?orderId=ord-1&status=done")
            .reply(&routes)
            .await;
        assert_eq!(callback.status(), 400);
    }

    #[tokio::test]
    async fn test_invalid_amount_rejected() {
        let routes = test_routes();

        let created = warp::test::request()
            .method("POST")
            .path("/payments")
            .json(&serde_json::json!({
                "orderId": "ord-1",
                "amount": "abc",
                "address": "EQAbc",
            }))
            .reply(&routes)
            .await;
        assert_eq!(created.status(), 400);
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let routes = test_routes();

        let health = warp::test::request()
            .method("GET")
            .path("/health")
            .reply(&routes)
            .await;
        assert_eq!(health.status(), 200);

        let body: serde_json::Value = serde_json::from_slice(health.body()).unwrap();
        assert_eq!(body["status"], "healthy");
    }
}
