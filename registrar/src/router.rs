use std::future::ready;

use axum::{routing::get, Json, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::metrics::track_metrics;

async fn ping() -> Json<Value> {
    Json(json!({ "message": "hello" }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "UP" }))
}

/// Build the service router.
///
/// `/metrics` renders from `metrics` when a recorder is installed. Installing the
/// global recorder is left to the caller, as it does not work well in tests.
pub fn router(metrics: Option<PrometheusHandle>) -> Router {
    Router::new()
        .route("/v1/ping", get(ping))
        .route("/health", get(health))
        .route(
            "/metrics",
            get(move || match metrics {
                Some(ref recorder_handle) => ready(recorder_handle.render()),
                None => ready("no metrics recorder installed".to_owned()),
            }),
        )
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(track_metrics))
}
