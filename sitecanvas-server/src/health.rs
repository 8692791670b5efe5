//! Health check endpoints for Kubernetes probes.
//!
//! - `/health/live` - Liveness probe (restart if fails)
//! - `/health/ready` - Readiness probe (remove from LB if fails)
//! - `/health` - Same as readiness

use std::path::Path;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

/// Health status response.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    /// Overall status: "healthy" or "unhealthy"
    pub status: &'static str,
    /// Server version
    pub version: &'static str,
    /// Individual component checks
    pub checks: HealthChecks,
}

/// Individual health checks.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    /// Projects currently held by the store.
    pub projects: usize,
    /// Data directory is a writable directory, or persistence is disabled.
    pub data_dir: bool,
    /// Hosting provider in use ("vercel" or "mock").
    pub provider: &'static str,
}

/// Liveness probe - is the server running?
#[tracing::instrument(name = "liveness_probe")]
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe - is the server ready to accept traffic?
#[tracing::instrument(name = "readiness_probe", skip(state))]
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let store = state.gateway.store();
    let all_ok = data_dir_writable(store.data_dir());
    let status = HealthStatus {
        status: if all_ok { "healthy" } else { "unhealthy" },
        version: env!("CARGO_PKG_VERSION"),
        checks: HealthChecks {
            projects: store.len(),
            data_dir: all_ok,
            provider: state.gateway.provider_name(),
        },
    };

    let code = if all_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(status))
}

/// Whether saves can be mirrored to `dir`. No directory means persistence is
/// off, which is always ready.
fn data_dir_writable(dir: Option<&Path>) -> bool {
    let Some(dir) = dir else {
        return true;
    };
    match std::fs::metadata(dir) {
        Ok(meta) => meta.is_dir() && !meta.permissions().readonly(),
        Err(e) => {
            tracing::warn!("Data directory {} unavailable: {e}", dir.display());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_dir_check() {
        assert!(data_dir_writable(None));

        let dir = tempfile::tempdir().expect("tempdir");
        assert!(data_dir_writable(Some(dir.path())));

        let missing = dir.path().join("gone");
        assert!(!data_dir_writable(Some(&missing)));

        let file = dir.path().join("file.json");
        std::fs::write(&file, "{}").expect("write");
        assert!(!data_dir_writable(Some(&file)));
    }

    #[test]
    fn test_health_status_serialization() {
        let status = HealthStatus {
            status: "healthy",
            version: "0.1.0",
            checks: HealthChecks {
                projects: 3,
                data_dir: true,
                provider: "mock",
            },
        };

        let json = serde_json::to_string(&status).expect("should serialize");
        assert!(json.contains("healthy"));
        assert!(json.contains("0.1.0"));
        assert!(json.contains("\"projects\":3"));
        assert!(json.contains("\"provider\":\"mock\""));
    }

    #[test]
    fn test_health_status_unhealthy() {
        let status = HealthStatus {
            status: "unhealthy",
            version: "0.1.0",
            checks: HealthChecks {
                projects: 0,
                data_dir: false,
                provider: "vercel",
            },
        };

        let json = serde_json::to_string(&status).expect("should serialize");
        assert!(json.contains("unhealthy"));
        assert!(json.contains("\"data_dir\":false"));
    }
}
