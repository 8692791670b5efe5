//! Prometheus metrics for the gateway.
//!
//! Provides metrics collection and a Prometheus-compatible `/metrics` endpoint.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

const HTTP_REQUESTS_TOTAL: &str = "sitecanvas_http_requests_total";
const HTTP_REQUEST_DURATION: &str = "sitecanvas_http_request_duration_seconds";
const PROJECT_SAVES_TOTAL: &str = "sitecanvas_project_saves_total";
const PROJECTS_TOTAL: &str = "sitecanvas_projects_total";
const GENERATIONS_TOTAL: &str = "sitecanvas_generations_total";
const DEPLOYMENTS_TOTAL: &str = "sitecanvas_deployments_total";
const VALIDATION_FAILURES_TOTAL: &str = "sitecanvas_validation_failures_total";

/// Initialize metrics and return the Prometheus handle.
///
/// # Errors
///
/// Returns an error if the Prometheus recorder cannot be installed
/// (e.g., if another recorder is already installed).
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Record an HTTP request.
///
/// `path` should be the matched route template, not the raw URI, to keep
/// label cardinality bounded.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    counter!(
        HTTP_REQUESTS_TOTAL,
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        HTTP_REQUEST_DURATION,
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_secs);
}

/// Middleware that records every routed request.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "unmatched".to_string(), |p| p.as_str().to_string());

    let response = next.run(request).await;
    record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        started.elapsed().as_secs_f64(),
    );
    response
}

/// Record a project save.
///
/// * `outcome` - "ok", "conflict" or "error"
pub fn record_save(outcome: &str) {
    counter!(PROJECT_SAVES_TOTAL, "outcome" => outcome.to_string()).increment(1);
}

/// Update the stored project count.
#[allow(clippy::cast_precision_loss)]
pub fn set_projects_total(count: usize) {
    gauge!(PROJECTS_TOTAL).set(count as f64);
}

/// Record a code generation for a target.
pub fn record_generation(target: &str) {
    counter!(GENERATIONS_TOTAL, "target" => target.to_string()).increment(1);
}

/// Record a deployment outcome.
///
/// * `provider` - "vercel" or "mock"
/// * `status` - "building", "success", "failed" or "unavailable"
pub fn record_deployment(provider: &str, status: &str) {
    counter!(
        DEPLOYMENTS_TOTAL,
        "provider" => provider.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record an input validation failure.
///
/// * `validation_type` - Which check failed (project_id, element_count, ...)
pub fn record_validation_failure(validation_type: &str) {
    counter!(
        VALIDATION_FAILURES_TOTAL,
        "type" => validation_type.to_string()
    )
    .increment(1);
}
