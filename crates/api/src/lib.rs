//! HTTP API server with observability for the purchasing system.
//!
//! Provides REST endpoints for vendors, catalog items, purchase orders and
//! dashboard counters behind a bearer-token check, with structured logging
//! (tracing) and Prometheus metrics.

pub mod auth;
pub mod config;
pub mod error;
pub mod response;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use error::ApiError;
pub use state::{AppState, create_default_state};

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(routes::metrics::MetricsState {
            handle: metrics_handle,
            app: Arc::clone(&state),
        });

    let api = Router::new()
        .route("/dashboard/stats", get(routes::dashboard::stats))
        .route(
            "/vendors",
            get(routes::vendors::list).post(routes::vendors::create),
        )
        .route(
            "/vendors/{id}",
            get(routes::vendors::get)
                .put(routes::vendors::update)
                .delete(routes::vendors::delete),
        )
        .route("/items", get(routes::items::list))
        .route("/items/{id}", get(routes::items::get))
        .route(
            "/purchase-orders",
            get(routes::purchase_orders::list).post(routes::purchase_orders::create),
        )
        .route(
            "/purchase-orders/{id}",
            get(routes::purchase_orders::get)
                .put(routes::purchase_orders::update)
                .delete(routes::purchase_orders::delete),
        )
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth::require_token,
        ))
        .route("/auth", post(auth::authenticate));

    Router::new()
        .route("/health", get(routes::health::check))
        .nest("/api", api)
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
