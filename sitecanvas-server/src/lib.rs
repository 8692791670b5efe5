//! # SiteCanvas Server Library
//!
//! HTTP gateway for SiteCanvas: project persistence, code generation and
//! deployment. Shared by the binary and the integration tests.

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub mod config;
pub mod deploy;
pub mod error;
pub mod gateway;
pub mod health;
pub mod metrics;
pub mod routes;
pub mod validation;

pub use config::Config;
pub use error::{GatewayError, GatewayResult};
pub use gateway::Gateway;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Projects, generation and deployments.
    pub gateway: Gateway,
    /// Renders `/metrics`.
    pub metrics: PrometheusHandle,
}

impl AppState {
    /// Bundle a gateway with a metrics handle.
    #[must_use]
    pub fn new(gateway: Gateway, metrics: PrometheusHandle) -> Self {
        Self { gateway, metrics }
    }
}

/// Build a CORS layer that only allows localhost origins.
fn build_cors_layer(port: u16) -> CorsLayer {
    let localhost_origins = [
        format!("http://localhost:{port}"),
        format!("http://127.0.0.1:{port}"),
        // Editor dev servers
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
        "http://127.0.0.1:3000".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ];

    let origins: Vec<HeaderValue> = localhost_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static(routes::CALLER_HEADER),
        ])
        .allow_credentials(true)
}

/// Prometheus metrics endpoint.
#[tracing::instrument(name = "metrics", skip(state))]
async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics.render()
}

/// Build the full application router.
///
/// `port` is the port the server listens on; it only feeds the CORS origin
/// list.
pub fn build_router(state: AppState, port: u16) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/health", get(health::readiness))
        .route(
            "/api/projects",
            get(routes::list_projects).post(routes::create_project),
        )
        .route(
            "/api/projects/{id}",
            get(routes::get_project)
                .put(routes::save_project)
                .delete(routes::delete_project),
        )
        .route("/api/projects/{id}/generate", post(routes::generate_project))
        .route("/api/generate", post(routes::generate))
        .route("/api/deploy", post(routes::deploy))
        .route("/api/deploy/{deployment_id}", get(routes::deployment_status))
        .route_layer(middleware::from_fn(metrics::track_requests))
        // Request ID for distributed tracing correlation
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(build_cors_layer(port))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
