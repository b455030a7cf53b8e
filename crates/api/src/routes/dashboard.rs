//! Dashboard counters endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use projections::{DashboardSnapshot, TrendDeltas};
use serde::Serialize;

use crate::response::Envelope;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardStatsResponse {
    pub open_orders: usize,
    pub total_spend_cents: i64,
    pub active_vendors: usize,
    pub pending_deliveries: usize,
    pub overdue_deliveries: usize,
    pub trends: TrendDeltas,
}

impl From<DashboardSnapshot> for DashboardStatsResponse {
    fn from(snapshot: DashboardSnapshot) -> Self {
        Self {
            open_orders: snapshot.open_orders,
            total_spend_cents: snapshot.total_spend.cents(),
            active_vendors: snapshot.active_vendors,
            pending_deliveries: snapshot.pending_deliveries,
            overdue_deliveries: snapshot.overdue_deliveries,
            trends: snapshot.trends,
        }
    }
}

/// GET /api/dashboard/stats: current dashboard counters.
#[tracing::instrument(skip(state))]
pub async fn stats(State(state): State<Arc<AppState>>) -> Json<Envelope<DashboardStatsResponse>> {
    let snapshot = state.dashboard.snapshot_as_of(state.clock.today()).await;
    Json(Envelope::data(snapshot.into()))
}
