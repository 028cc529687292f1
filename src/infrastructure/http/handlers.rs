//! Backend HTTP handlers
//!
//! The mini-app talks to these endpoints for order bookkeeping: creating a
//! pending order before the transfer, receiving the status callback, and
//! polling order state. Every handler replies with JSON and maps errors
//! through `AppError::http_status_code`.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;
use warp::Reply;

use crate::application::services::SharedOrderService;
use crate::domain::amount::TonAmount;
use crate::domain::order::OrderStatus;
use crate::infrastructure::http::models::{CallbackQuery, CreateOrderRequest, HealthResponse, OrderResponse};
use crate::middleware::RateLimitMiddleware;
use crate::shared::error::AppError;
use crate::shared::metrics::MetricsUtils;

fn error_reply(error: &AppError) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(
        warp::reply::json(&serde_json::json!({ "error": error.to_string() })),
        error.http_status_code(),
    )
}

pub async fn handle_create_order(
    body: CreateOrderRequest,
    service: SharedOrderService,
    rate_limit: Arc<RateLimitMiddleware>,
) -> Result<impl Reply, warp::reject::Rejection> {
    let request_id = Uuid::new_v4();

    if let Err(e) = rate_limit.check() {
        return Ok(error_reply(&e));
    }

    if let Err(e) = body.validate() {
        return Ok(error_reply(&AppError::Validation(e.to_string())));
    }

    let amount = match TonAmount::from_major_units(&body.amount) {
        Ok(amount) => amount,
        Err(e) => return Ok(error_reply(&AppError::Validation(e.to_string()))),
    };

    info!(%request_id, order_id = %body.order_id, "Create order request");

    let product_name = body
        .product_name
        .unwrap_or_else(|| crate::domain::intent::DEFAULT_PRODUCT_NAME.to_string());

    match service
        .create_order(body.order_id, amount, body.address, product_name)
        .await
    {
        Ok(record) => Ok(warp::reply::with_status(
            warp::reply::json(&OrderResponse::from(record)),
            warp::http::StatusCode::CREATED,
        )),
        Err(e) => {
            warn!(%request_id, error = %e, "Order creation failed");
            Ok(error_reply(&e))
        }
    }
}

pub async fn handle_callback(
    query: CallbackQuery,
    service: SharedOrderService,
    rate_limit: Arc<RateLimitMiddleware>,
) -> Result<impl Reply, warp::reject::Rejection> {
    let request_id = Uuid::new_v4();

    if let Err(e) = rate_limit.check() {
        return Ok(error_reply(&e));
    }

    let status: OrderStatus = match query.status.parse() {
        Ok(status) => status,
        Err(e) => return Ok(error_reply(&AppError::Validation(e))),
    };

    info!(%request_id, order_id = %query.order_id, status = %query.status, "Status callback");

    match service.update_status(&query.order_id, status).await {
        Ok(record) => Ok(warp::reply::with_status(
            warp::reply::json(&OrderResponse::from(record)),
            warp::http::StatusCode::OK,
        )),
        Err(e) => {
            warn!(%request_id, error = %e, "Status callback failed");
            // The callback contract treats an unknown order as a bad request
            let e = match e {
                AppError::NotFound(detail) => AppError::Validation(detail),
                other => other,
            };
            Ok(error_reply(&e))
        }
    }
}

pub async fn handle_order_status(
    order_id: String,
    service: SharedOrderService,
) -> Result<impl Reply, warp::reject::Rejection> {
    match service.get_order(&order_id).await {
        Ok(Some(record)) => Ok(warp::reply::with_status(
            warp::reply::json(&OrderResponse::from(record)),
            warp::http::StatusCode::OK,
        )),
        Ok(None) => Ok(error_reply(&AppError::NotFound(format!("order {}", order_id)))),
        Err(e) => Ok(error_reply(&e)),
    }
}

pub async fn handle_health(
    metrics: Arc<MetricsUtils>,
) -> Result<impl Reply, warp::reject::Rejection> {
    let snapshot = metrics.get_metrics();
    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: snapshot.uptime_seconds,
    };
    Ok(warp::reply::json(&response))
}
