//! Backend route definitions

use std::sync::Arc;
use warp::Filter;

use crate::application::services::SharedOrderService;
use crate::infrastructure::http::handlers::{
    handle_callback, handle_create_order, handle_health, handle_order_status,
};
use crate::middleware::RateLimitMiddleware;
use crate::shared::metrics::MetricsUtils;

const MAX_REQUEST_SIZE: u64 = 16 * 1024;

pub struct PaymentRoutes;

impl PaymentRoutes {
    pub fn create_routes(
        service: SharedOrderService,
        metrics: Arc<MetricsUtils>,
        rate_limit: Arc<RateLimitMiddleware>,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        let create = warp::path("payments")
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::content_length_limit(MAX_REQUEST_SIZE))
            .and(warp::body::json())
            .and(Self::with_service(service.clone()))
            .and(Self::with_rate_limit(rate_limit.clone()))
            .and_then(handle_create_order);

        // The callback route must be matched before the order id parameter
        let callback = warp::path("payments")
            .and(warp::path("callback"))
            .and(warp::path::end())
            .and(warp::get())
            .and(warp::query())
            .and(Self::with_service(service.clone()))
            .and(Self::with_rate_limit(rate_limit))
            .and_then(handle_callback);

        let status = warp::path("payments")
            .and(warp::path::param::<String>())
            .and(warp::path::end())
            .and(warp::get())
            .and(Self::with_service(service))
            .and_then(handle_order_status);

        let health = warp::path("health")
            .and(warp::path::end())
            .and(warp::get())
            .and(Self::with_metrics(metrics))
            .and_then(handle_health);

        create.or(callback).or(status).or(health)
    }

    fn with_service(
        service: SharedOrderService,
    ) -> impl Filter<Extract = (SharedOrderService,), Error = std::convert::Infallible> + Clone {
        warp::any().map(move || service.clone())
    }

    fn with_rate_limit(
        rate_limit: Arc<RateLimitMiddleware>,
    ) -> impl Filter<Extract = (Arc<RateLimitMiddleware>,), Error = std::convert::Infallible> + Clone {
        warp::any().map(move || rate_limit.clone())
    }

    fn with_metrics(
        metrics: Arc<MetricsUtils>,
    ) -> impl Filter<Extract = (Arc<MetricsUtils>,), Error = std::convert::Infallible> + Clone {
        warp::any().map(move || metrics.clone())
    }
}
