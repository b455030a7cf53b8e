//! Prometheus metrics endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;

use crate::state::AppState;

/// State for the metrics router: the exporter handle plus the app whose
/// dashboard feeds the gauges.
#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
    pub app: Arc<AppState>,
}

/// GET /metrics: returns Prometheus-formatted metrics.
///
/// Dashboard gauges are refreshed from the projection on every scrape.
pub async fn get(State(metrics): State<MetricsState>) -> impl IntoResponse {
    let app = &metrics.app;
    let snapshot = app.dashboard.snapshot_as_of(app.clock.today()).await;

    metrics::gauge!("dashboard_open_orders").set(snapshot.open_orders as f64);
    metrics::gauge!("dashboard_active_vendors").set(snapshot.active_vendors as f64);
    metrics::gauge!("dashboard_pending_deliveries").set(snapshot.pending_deliveries as f64);
    metrics::gauge!("dashboard_overdue_deliveries").set(snapshot.overdue_deliveries as f64);
    metrics::gauge!("dashboard_total_spend_cents").set(snapshot.total_spend.cents() as f64);

    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics.handle.render(),
    )
}
