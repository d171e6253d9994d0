//! Prometheus metrics endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;

/// Registers help text for the counters the services emit.
pub fn describe() {
    metrics::describe_counter!(
        "orders_created_total",
        "Orders stored, labelled by workflow (direct or checkout)"
    );
    metrics::describe_counter!(
        "checkout_rejected_total",
        "Checkouts refused, labelled by reason"
    );
    metrics::describe_counter!(
        "lesson_capacity_updates_total",
        "Direct overwrites of a lesson's available spaces"
    );
    metrics::describe_counter!(
        "store_conditional_updates_total",
        "Conditional capacity updates, labelled by outcome (applied or rejected)"
    );
    metrics::describe_counter!(
        "store_errors_total",
        "Requests that failed because the document store errored"
    );
}

/// GET /metrics — returns Prometheus-formatted metrics.
pub async fn get(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        handle.render(),
    )
}
