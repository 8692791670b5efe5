//! API route handlers.
//!
//! Every handler answers with the `{success, data}` / `{success, error}`
//! envelope. Ids and element lists are validated here, once, before they
//! reach the gateway.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use sitecanvas_codegen::{GenerateOptions, Target};
use sitecanvas_core::{Element, NewProject, ProjectChanges};

use crate::error::{GatewayError, GatewayResult};
use crate::metrics;
use crate::validation::{
    validate_deployment_id, validate_elements, validate_project_id, validate_title,
    validate_user_id, ValidationError,
};
use crate::AppState;

/// Header carrying the caller id.
pub const CALLER_HEADER: &str = "x-user-id";

/// Successful response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Always `true`.
    pub success: bool,
    /// Payload.
    pub data: T,
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

fn ok<T>(data: T) -> ApiResponse<T> {
    ApiResponse {
        success: true,
        data,
    }
}

fn checked(result: Result<(), ValidationError>) -> GatewayResult<()> {
    result.map_err(|err| {
        metrics::record_validation_failure(err.kind());
        GatewayError::Validation(err)
    })
}

/// Caller id taken from the `x-user-id` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerId(pub String);

impl<S: Send + Sync> FromRequestParts<S> for CallerId {
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let caller = parts
            .headers
            .get(CALLER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(GatewayError::MissingCaller)?;
        checked(validate_user_id(caller))?;
        Ok(Self(caller.to_string()))
    }
}

/// JSON body whose rejections use the error envelope.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| GatewayError::InvalidInput(rejection.body_text()))?;
        Ok(Self(value))
    }
}

fn parse_target(target: Option<&str>) -> GatewayResult<Target> {
    target.map_or(Ok(Target::React), |name| {
        name.parse()
            .map_err(|err: sitecanvas_codegen::CodegenError| GatewayError::InvalidInput(err.to_string()))
    })
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// `GET /api/projects`
pub async fn list_projects(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
) -> impl IntoResponse {
    ok(state.gateway.list(&caller))
}

/// `POST /api/projects`
pub async fn create_project(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    ApiJson(project): ApiJson<NewProject>,
) -> GatewayResult<impl IntoResponse> {
    checked(validate_title(&project.title))?;
    checked(validate_elements(&project.elements))?;
    let doc = state.gateway.create(&caller, project)?;
    Ok((StatusCode::CREATED, ok(doc)))
}

/// `GET /api/projects/{id}`
pub async fn get_project(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(id): Path<String>,
) -> GatewayResult<impl IntoResponse> {
    checked(validate_project_id(&id))?;
    Ok(ok(state.gateway.get(&caller, &id)?))
}

/// Body of `PUT /api/projects/{id}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveProjectRequest {
    /// New element list.
    #[serde(default)]
    pub elements: Option<Vec<Element>>,
    /// Save version token.
    #[serde(default)]
    pub version: Option<u64>,
    /// Descriptive fields to change.
    #[serde(flatten)]
    pub changes: ProjectChanges,
}

/// `PUT /api/projects/{id}`
pub async fn save_project(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<SaveProjectRequest>,
) -> GatewayResult<impl IntoResponse> {
    checked(validate_project_id(&id))?;
    if let Some(title) = &body.changes.title {
        checked(validate_title(title))?;
    }
    if let Some(elements) = &body.elements {
        checked(validate_elements(elements))?;
    }

    if let Some(elements) = body.elements {
        state.gateway.save(&caller, &id, elements, body.version)?;
    }
    if !body.changes.is_empty() {
        state.gateway.update_details(&caller, &id, body.changes)?;
    }
    Ok(ok(state.gateway.get(&caller, &id)?))
}

/// `DELETE /api/projects/{id}`
pub async fn delete_project(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(id): Path<String>,
) -> GatewayResult<impl IntoResponse> {
    checked(validate_project_id(&id))?;
    state.gateway.delete(&caller, &id)?;
    Ok(ok(json!({ "id": id })))
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Body of `POST /api/generate`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Elements to generate from.
    pub elements: Vec<Element>,
    /// Target name; React when absent.
    #[serde(default)]
    pub target: Option<String>,
    /// React options.
    #[serde(default)]
    pub options: GenerateOptions,
}

/// `POST /api/generate`
pub async fn generate(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<GenerateRequest>,
) -> GatewayResult<impl IntoResponse> {
    checked(validate_elements(&body.elements))?;
    let target = parse_target(body.target.as_deref())?;
    Ok(ok(state.gateway.generate(&body.elements, target, &body.options)))
}

/// Body of `POST /api/projects/{id}/generate`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateProjectRequest {
    /// Target name; React when absent.
    #[serde(default)]
    pub target: Option<String>,
    /// React options.
    #[serde(default)]
    pub options: GenerateOptions,
}

/// `POST /api/projects/{id}/generate`
pub async fn generate_project(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<GenerateProjectRequest>,
) -> GatewayResult<impl IntoResponse> {
    checked(validate_project_id(&id))?;
    let target = parse_target(body.target.as_deref())?;
    let code = state
        .gateway
        .generate_project(&caller, &id, target, &body.options)?;
    Ok(ok(code))
}

// ---------------------------------------------------------------------------
// Deployment
// ---------------------------------------------------------------------------

/// Body of `POST /api/deploy`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    /// Project to publish.
    pub project_id: String,
}

/// `POST /api/deploy`
pub async fn deploy(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    ApiJson(body): ApiJson<DeployRequest>,
) -> GatewayResult<impl IntoResponse> {
    checked(validate_project_id(&body.project_id))?;
    let record = state.gateway.deploy(&caller, &body.project_id).await?;
    Ok(ok(record))
}

/// `GET /api/deploy/{deployment_id}`
pub async fn deployment_status(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(deployment_id): Path<String>,
) -> GatewayResult<impl IntoResponse> {
    checked(validate_deployment_id(&deployment_id))?;
    let record = state.gateway.deployment_status(&caller, &deployment_id).await?;
    Ok(ok(record))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target(None).expect("default"), Target::React);
        assert_eq!(parse_target(Some("HTML")).expect("html"), Target::Html);
        assert_eq!(parse_target(Some("javascript")).expect("js"), Target::Js);
        assert!(matches!(
            parse_target(Some("svelte")),
            Err(GatewayError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_save_request_flattens_changes() {
        let body: SaveProjectRequest = serde_json::from_value(json!({
            "elements": [],
            "version": 4,
            "title": "Renamed"
        }))
        .expect("parse");
        assert_eq!(body.version, Some(4));
        assert_eq!(body.elements.as_deref(), Some(&[][..]));
        assert_eq!(body.changes.title.as_deref(), Some("Renamed"));
        assert!(body.changes.description.is_none());
    }

    #[test]
    fn test_envelope_shape() {
        let value = serde_json::to_value(ok(json!({ "id": "p1" }))).expect("serialize");
        assert_eq!(value, json!({ "success": true, "data": { "id": "p1" } }));
    }
}
