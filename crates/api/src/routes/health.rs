//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub vendors: usize,
    pub items: usize,
    pub purchase_orders: usize,
}

/// GET /health: liveness plus the size of each collection.
pub async fn check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        vendors: state.store.vendors.len().await,
        items: state.store.items.len().await,
        purchase_orders: state.store.orders.len().await,
    })
}
