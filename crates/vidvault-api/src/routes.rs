//! API routes.

use std::sync::Arc;

use axum::middleware;
use axum::routing::get;
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::access::{HOME_PATH, SIGN_IN_PATH, SIGN_UP_PATH, VIDEOS_API_PATH};
use crate::handlers::{delete_video, health, home, list_videos, not_found, ready, sign_in, sign_up};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    access_guard, cors_layer, rate_limit_middleware, request_id, request_logging,
    security_headers, RateLimiterCache,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let rate_limiter = Arc::new(RateLimiterCache::new(state.config.rate_limit_rps));

    let api_routes = Router::new()
        .route(VIDEOS_API_PATH, get(list_videos).delete(delete_video))
        .layer(middleware::from_fn_with_state(rate_limiter, rate_limit_middleware));

    let page_routes = Router::new()
        .route(HOME_PATH, get(home))
        .route(SIGN_IN_PATH, get(sign_in))
        .route(SIGN_UP_PATH, get(sign_up));

    // Everything behind the access guard, including unmatched paths
    let guarded_routes = Router::new()
        .merge(api_routes)
        .merge(page_routes)
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), access_guard));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .merge(guarded_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
