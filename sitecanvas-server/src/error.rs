//! Gateway errors and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sitecanvas_core::StoreError;
use thiserror::Error;

use crate::deploy::DeployError;
use crate::validation::ValidationError;

/// Outcome of a failed gateway operation.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Request data failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Request body or parameters could not be understood.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// No caller id was supplied.
    #[error("missing x-user-id header")]
    MissingCaller,
    /// The project or deployment does not exist.
    #[error("{0}")]
    NotFound(String),
    /// The caller does not own the project.
    #[error("{0}")]
    Unauthorized(String),
    /// Storage or the hosting provider could not be reached.
    #[error("{0}")]
    BackendUnavailable(String),
    /// A save was based on an outdated version.
    #[error("{0}")]
    Conflict(String),
    /// The operation failed for another reason.
    #[error("{0}")]
    Failed(String),
}

/// Result alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::MissingCaller | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for GatewayError {
    fn from(err: StoreError) -> Self {
        let message = err.to_string();
        match err {
            StoreError::ProjectNotFound(_) => Self::NotFound(message),
            StoreError::Unauthorized(_) => Self::Unauthorized(message),
            StoreError::Conflict { .. } => Self::Conflict(message),
            StoreError::InvalidElements(_) => Self::InvalidInput(message),
            StoreError::BackendUnavailable(_) | StoreError::Io(_) | StoreError::Serialization(_) => {
                Self::BackendUnavailable(message)
            }
        }
    }
}

impl From<DeployError> for GatewayError {
    fn from(err: DeployError) -> Self {
        let message = err.to_string();
        if err.is_unavailable() {
            return Self::BackendUnavailable(message);
        }
        match err {
            DeployError::NotFound(_) => Self::NotFound(message),
            _ => Self::Failed(message),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(%status, error = %self, "Request failed");
        } else {
            tracing::debug!(%status, error = %self, "Request rejected");
        }
        (
            status,
            Json(json!({ "success": false, "error": self.to_string() })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (GatewayError::Validation(ValidationError::TooManyElements), 400),
            (GatewayError::InvalidInput("x".into()), 400),
            (GatewayError::MissingCaller, 401),
            (GatewayError::Unauthorized("x".into()), 401),
            (GatewayError::NotFound("x".into()), 404),
            (GatewayError::Conflict("x".into()), 409),
            (GatewayError::BackendUnavailable("x".into()), 503),
            (GatewayError::Failed("x".into()), 500),
        ];
        for (err, code) in cases {
            assert_eq!(err.status_code().as_u16(), code, "{err}");
        }
    }

    #[test]
    fn test_store_errors_map() {
        assert!(matches!(
            GatewayError::from(StoreError::ProjectNotFound("p".into())),
            GatewayError::NotFound(_)
        ));
        assert!(matches!(
            GatewayError::from(StoreError::Conflict {
                stored: 2,
                attempted: 1
            }),
            GatewayError::Conflict(_)
        ));
        assert!(matches!(
            GatewayError::from(StoreError::Io(std::io::Error::other("disk"))),
            GatewayError::BackendUnavailable(_)
        ));
    }

    #[test]
    fn test_deploy_errors_map() {
        let server = DeployError::Api {
            status: 502,
            message: "bad gateway".into(),
        };
        assert!(matches!(GatewayError::from(server), GatewayError::BackendUnavailable(_)));
        let client = DeployError::Api {
            status: 400,
            message: "bad files".into(),
        };
        assert!(matches!(GatewayError::from(client), GatewayError::Failed(_)));
        assert!(matches!(
            GatewayError::from(DeployError::NotFound("d".into())),
            GatewayError::NotFound(_)
        ));
    }
}
