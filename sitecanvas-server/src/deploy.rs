//! Hosting provider clients and deployment records.
//!
//! A [`HostingProvider`] takes a `path -> content` file map and publishes it.
//! [`VercelClient`] talks to a Vercel-style REST API; [`MockProvider`]
//! answers locally with a ready deployment.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sitecanvas_codegen::{slugify, FileMap};
use sitecanvas_core::store::current_timestamp_ms;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

/// Deployments kept in memory per registry or mock provider. Beyond this the
/// oldest settled entries are evicted first.
pub const MAX_TRACKED_DEPLOYMENTS: usize = 1024;

/// Evict entries until one more fits under `capacity`. Entries with the
/// lowest `rank` go first; ids break ties.
fn make_room<V, K: Ord>(map: &mut HashMap<String, V>, capacity: usize, rank: impl Fn(&V) -> K) {
    while !map.is_empty() && map.len() >= capacity {
        let Some(oldest) = map
            .iter()
            .min_by(|a, b| rank(a.1).cmp(&rank(b.1)).then_with(|| a.0.cmp(b.0)))
            .map(|(id, _)| id.clone())
        else {
            break;
        };
        map.remove(&oldest);
        debug!(id = %oldest, "Evicted deployment record");
    }
}

/// Errors raised while talking to a hosting provider.
#[derive(Debug, Error)]
pub enum DeployError {
    /// The configured API base URL is invalid.
    #[error("invalid deployment URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed (connection, timeout, etc.).
    #[error("hosting provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The provider answered with an error status.
    #[error("hosting provider returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Provider error message.
        message: String,
    },
    /// The provider's answer did not have the expected shape.
    #[error("unexpected hosting provider response: {0}")]
    UnexpectedResponse(String),
    /// The provider does not know the deployment.
    #[error("deployment not found: {0}")]
    NotFound(String),
}

impl DeployError {
    /// Whether the provider could not be reached or failed on its side.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Outcome of a deployment as the gateway reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    /// Still building or queued.
    Building,
    /// Live.
    Success,
    /// Failed or cancelled.
    Failed,
}

impl DeploymentStatus {
    /// Map a provider `readyState`.
    ///
    /// Unrecognised states count as still building so that a later status
    /// check can settle them.
    #[must_use]
    pub fn from_provider_state(state: &str) -> Self {
        match state.to_ascii_uppercase().as_str() {
            "READY" => Self::Success,
            "ERROR" | "CANCELED" | "CANCELLED" => Self::Failed,
            _ => Self::Building,
        }
    }

    /// Wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Building => "building",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

/// What is sent to a hosting provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRequest {
    /// Display name of the project; slugified by providers.
    pub project_name: String,
    /// Files to publish.
    pub files: FileMap,
}

/// What a hosting provider answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDeployment {
    /// Provider deployment id.
    pub id: String,
    /// Public URL, with scheme.
    pub url: String,
    /// Mapped status.
    pub status: DeploymentStatus,
    /// Creation time in milliseconds since the Unix epoch.
    pub created_at: u64,
}

/// A service that publishes file maps.
#[async_trait]
pub trait HostingProvider: Send + Sync {
    /// Short provider name for logs and health output.
    fn name(&self) -> &'static str;

    /// Start a deployment.
    async fn deploy(&self, request: &DeploymentRequest) -> Result<ProviderDeployment, DeployError>;

    /// Fetch the current state of a deployment.
    async fn status(&self, deployment_id: &str) -> Result<ProviderDeployment, DeployError>;
}

// ---------------------------------------------------------------------------
// Vercel
// ---------------------------------------------------------------------------

/// Client for a Vercel-style deployments API.
#[derive(Debug, Clone)]
pub struct VercelClient {
    http: Client,
    base: Url,
    token: String,
    team_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VercelDeployment {
    id: String,
    #[serde(default)]
    url: String,
    #[serde(default, alias = "state")]
    ready_state: Option<String>,
    #[serde(default)]
    created_at: Option<u64>,
}

impl VercelClient {
    /// Create a client for the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::InvalidUrl`] if the URL is malformed, or
    /// [`DeployError::Http`] if the HTTP client fails to build.
    pub fn new(
        base_url: &str,
        token: impl Into<String>,
        team_id: Option<String>,
    ) -> Result<Self, DeployError> {
        let base = Url::parse(base_url).map_err(|e| DeployError::InvalidUrl(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(DeployError::InvalidUrl(base_url.to_string()));
        }
        let http = Client::builder()
            .user_agent(concat!("sitecanvas/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base,
            token: token.into(),
            team_id,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, DeployError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| DeployError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request.bearer_auth(&self.token);
        match &self.team_id {
            Some(team) => request.header("Vercel-Team-Id", team),
            None => request,
        }
    }

    /// JSON body of a deployment request, files base64-encoded.
    #[must_use]
    pub fn payload(request: &DeploymentRequest) -> Value {
        let files: Vec<Value> = request
            .files
            .iter()
            .map(|(path, content)| {
                json!({
                    "file": path,
                    "data": BASE64.encode(content.as_bytes()),
                    "encoding": "base64",
                })
            })
            .collect();
        json!({
            "name": slugify(&request.project_name),
            "files": files,
            "projectSettings": { "framework": "nextjs" },
            "env": [],
        })
    }

    async fn parse(response: reqwest::Response) -> Result<ProviderDeployment, DeployError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(DeployError::NotFound(error_message(response).await));
        }
        if !status.is_success() {
            return Err(DeployError::Api {
                status: status.as_u16(),
                message: error_message(response).await,
            });
        }
        let body: VercelDeployment = response
            .json()
            .await
            .map_err(|e| DeployError::UnexpectedResponse(e.to_string()))?;
        if body.id.is_empty() {
            return Err(DeployError::UnexpectedResponse("missing deployment id".into()));
        }
        Ok(ProviderDeployment {
            url: with_scheme(&body.url),
            status: DeploymentStatus::from_provider_state(body.ready_state.as_deref().unwrap_or("")),
            created_at: body.created_at.unwrap_or_else(current_timestamp_ms),
            id: body.id,
        })
    }
}

async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| {
            if text.is_empty() {
                status.to_string()
            } else {
                text
            }
        })
}

fn with_scheme(url: &str) -> String {
    if url.is_empty() || url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

#[async_trait]
impl HostingProvider for VercelClient {
    fn name(&self) -> &'static str {
        "vercel"
    }

    async fn deploy(&self, request: &DeploymentRequest) -> Result<ProviderDeployment, DeployError> {
        let url = self.endpoint(&["v13", "deployments"])?;
        debug!(%url, files = request.files.len(), "Creating deployment");
        let response = self
            .authorize(self.http.post(url))
            .json(&Self::payload(request))
            .send()
            .await?;
        let deployment = Self::parse(response).await?;
        info!(id = %deployment.id, status = deployment.status.as_str(), "Deployment created");
        Ok(deployment)
    }

    async fn status(&self, deployment_id: &str) -> Result<ProviderDeployment, DeployError> {
        let url = self.endpoint(&["v13", "deployments", deployment_id])?;
        let response = self.authorize(self.http.get(url)).send().await?;
        Self::parse(response).await
    }
}

// ---------------------------------------------------------------------------
// Mock
// ---------------------------------------------------------------------------

/// Provider that publishes nothing and reports every deployment as ready.
#[derive(Debug)]
pub struct MockProvider {
    sequence: AtomicU64,
    capacity: usize,
    deployments: RwLock<HashMap<String, ProviderDeployment>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::with_capacity(MAX_TRACKED_DEPLOYMENTS)
    }
}

impl MockProvider {
    /// Create an empty mock provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock provider that remembers at most `capacity` deployments.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sequence: AtomicU64::new(0),
            capacity: capacity.max(1),
            deployments: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl HostingProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn deploy(&self, request: &DeploymentRequest) -> Result<ProviderDeployment, DeployError> {
        let now = current_timestamp_ms();
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) % 1000;
        let id = format!("mock_{now}{seq:03}");
        let suffix = &id[id.len().saturating_sub(8)..];
        let deployment = ProviderDeployment {
            url: format!("https://{}-{suffix}.vercel.app", slugify(&request.project_name)),
            id: id.clone(),
            status: DeploymentStatus::Success,
            created_at: now,
        };
        let mut deployments = self.deployments.write().unwrap_or_else(PoisonError::into_inner);
        make_room(&mut deployments, self.capacity, |d| d.created_at);
        deployments.insert(id, deployment.clone());
        drop(deployments);
        debug!(id = %deployment.id, "Simulated deployment");
        Ok(deployment)
    }

    async fn status(&self, deployment_id: &str) -> Result<ProviderDeployment, DeployError> {
        self.deployments
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(deployment_id)
            .cloned()
            .ok_or_else(|| DeployError::NotFound(deployment_id.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A deployment as tracked by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    /// Provider deployment id.
    pub id: String,
    /// Project that was deployed.
    pub project_id: String,
    /// Caller who started the deployment.
    #[serde(skip)]
    pub owner: String,
    /// Public URL.
    pub url: String,
    /// Current status.
    pub status: DeploymentStatus,
    /// Provider that published it.
    pub provider: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub created_at: u64,
    /// Last status change in milliseconds since the Unix epoch.
    pub updated_at: u64,
}

impl DeploymentRecord {
    /// Record a fresh provider deployment.
    #[must_use]
    pub fn new(
        deployment: ProviderDeployment,
        project_id: impl Into<String>,
        owner: impl Into<String>,
        provider: &str,
    ) -> Self {
        Self {
            id: deployment.id,
            project_id: project_id.into(),
            owner: owner.into(),
            url: deployment.url,
            status: deployment.status,
            provider: provider.to_string(),
            created_at: deployment.created_at,
            updated_at: current_timestamp_ms(),
        }
    }
}

/// Deployments by id, shared across handlers.
///
/// Holds at most `capacity` records. When full, settled deployments are
/// evicted before building ones, least recently updated first.
#[derive(Debug, Clone)]
pub struct DeploymentRegistry {
    capacity: usize,
    records: Arc<RwLock<HashMap<String, DeploymentRecord>>>,
}

impl Default for DeploymentRegistry {
    fn default() -> Self {
        Self::with_capacity(MAX_TRACKED_DEPLOYMENTS)
    }
}

impl DeploymentRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry holding at most `capacity` records.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert or replace a record.
    pub fn insert(&self, record: DeploymentRecord) {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        if !records.contains_key(&record.id) {
            make_room(&mut records, self.capacity, |r| {
                (r.status == DeploymentStatus::Building, r.updated_at)
            });
        }
        records.insert(record.id.clone(), record);
    }

    /// Look up a record.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<DeploymentRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Apply a newer provider answer to a record. Returns the updated record.
    pub fn refresh(&self, deployment: &ProviderDeployment) -> Option<DeploymentRecord> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let record = records.get_mut(&deployment.id)?;
        record.status = deployment.status;
        if !deployment.url.is_empty() {
            record.url.clone_from(&deployment.url);
        }
        record.updated_at = current_timestamp_ms();
        Some(record.clone())
    }

    /// Number of tracked deployments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no deployment is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> DeploymentRequest {
        let mut files = FileMap::new();
        files.insert("index.html".to_string(), "<h1>Hi</h1>".to_string());
        DeploymentRequest {
            project_name: "My Shop".to_string(),
            files,
        }
    }

    #[test]
    fn test_provider_state_mapping() {
        assert_eq!(DeploymentStatus::from_provider_state("READY"), DeploymentStatus::Success);
        assert_eq!(DeploymentStatus::from_provider_state("ERROR"), DeploymentStatus::Failed);
        assert_eq!(DeploymentStatus::from_provider_state("CANCELED"), DeploymentStatus::Failed);
        assert_eq!(DeploymentStatus::from_provider_state("QUEUED"), DeploymentStatus::Building);
        assert_eq!(
            DeploymentStatus::from_provider_state("INITIALIZING"),
            DeploymentStatus::Building
        );
        assert_eq!(DeploymentStatus::from_provider_state("BUILDING"), DeploymentStatus::Building);
    }

    #[test]
    fn test_payload_encodes_files() {
        let payload = VercelClient::payload(&request());
        assert_eq!(payload["name"], "my-shop");
        assert_eq!(payload["files"][0]["file"], "index.html");
        assert_eq!(payload["files"][0]["encoding"], "base64");
        assert_eq!(payload["files"][0]["data"], BASE64.encode("<h1>Hi</h1>"));
        assert_eq!(payload["projectSettings"]["framework"], "nextjs");
    }

    #[test]
    fn test_with_scheme() {
        assert_eq!(with_scheme("shop.vercel.app"), "https://shop.vercel.app");
        assert_eq!(with_scheme("https://shop.vercel.app"), "https://shop.vercel.app");
    }

    #[tokio::test]
    async fn test_mock_provider_is_ready() {
        let provider = MockProvider::new();
        let first = provider.deploy(&request()).await.expect("deploy");
        let second = provider.deploy(&request()).await.expect("deploy");
        assert_ne!(first.id, second.id);
        assert_eq!(first.status, DeploymentStatus::Success);
        assert!(first.url.starts_with("https://my-shop-"));
        assert!(first.url.ends_with(".vercel.app"));
        assert_eq!(provider.status(&first.id).await.expect("status"), first);
        assert!(matches!(
            provider.status("missing").await,
            Err(DeployError::NotFound(_))
        ));
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn test_vercel_deploy_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v13/deployments"))
            .and(header("authorization", "Bearer secret"))
            .and(header("vercel-team-id", "team_1"))
            .and(body_partial_json(json!({ "name": "my-shop" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "dpl_123",
                "url": "my-shop-abc.vercel.app",
                "readyState": "BUILDING",
                "createdAt": 1_700_000_000_000_u64
            })))
            .mount(&server)
            .await;

        let client = VercelClient::new(&server.uri(), "secret", Some("team_1".to_string()))
            .expect("client");
        let deployment = client.deploy(&request()).await.expect("deploy");
        assert_eq!(deployment.id, "dpl_123");
        assert_eq!(deployment.url, "https://my-shop-abc.vercel.app");
        assert_eq!(deployment.status, DeploymentStatus::Building);
        assert_eq!(deployment.created_at, 1_700_000_000_000);
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn test_vercel_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v13/deployments"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": { "code": "forbidden", "message": "Not authorized" }
            })))
            .mount(&server)
            .await;

        let client = VercelClient::new(&server.uri(), "bad", None).expect("client");
        let err = client.deploy(&request()).await.expect_err("should fail");
        match err {
            DeployError::Api { status, ref message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "Not authorized");
            }
            ref other => panic!("unexpected error: {other}"),
        }
        assert!(!err.is_unavailable());
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn test_vercel_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v13/deployments/dpl_9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "dpl_9",
                "url": "x.vercel.app",
                "readyState": "READY"
            })))
            .mount(&server)
            .await;

        let client = VercelClient::new(&server.uri(), "secret", None).expect("client");
        let deployment = client.status("dpl_9").await.expect("status");
        assert_eq!(deployment.status, DeploymentStatus::Success);
    }

    #[test]
    fn test_registry_refresh() {
        let registry = DeploymentRegistry::new();
        let deployment = ProviderDeployment {
            id: "d1".to_string(),
            url: "https://a.vercel.app".to_string(),
            status: DeploymentStatus::Building,
            created_at: 1,
        };
        registry.insert(DeploymentRecord::new(deployment.clone(), "p1", "u1", "mock"));
        let ready = ProviderDeployment {
            status: DeploymentStatus::Success,
            ..deployment
        };
        let record = registry.refresh(&ready).expect("record");
        assert_eq!(record.status, DeploymentStatus::Success);
        assert_eq!(registry.get("d1").expect("stored").status, DeploymentStatus::Success);
        assert!(registry.refresh(&ProviderDeployment { id: "zz".into(), ..ready }).is_none());
    }

    fn record(id: &str, status: DeploymentStatus, updated_at: u64) -> DeploymentRecord {
        let deployment = ProviderDeployment {
            id: id.to_string(),
            url: format!("https://{id}.vercel.app"),
            status,
            created_at: updated_at,
        };
        DeploymentRecord {
            updated_at,
            ..DeploymentRecord::new(deployment, "p1", "u1", "mock")
        }
    }

    #[test]
    fn test_registry_evicts_settled_first() {
        let registry = DeploymentRegistry::with_capacity(3);
        registry.insert(record("building-old", DeploymentStatus::Building, 1));
        registry.insert(record("done-old", DeploymentStatus::Success, 2));
        registry.insert(record("failed", DeploymentStatus::Failed, 3));
        assert_eq!(registry.len(), 3);

        registry.insert(record("fresh", DeploymentStatus::Building, 4));
        assert_eq!(registry.len(), 3);
        assert!(registry.get("done-old").is_none());
        assert!(registry.get("building-old").is_some());

        // Replacing an existing id never evicts.
        registry.insert(record("fresh", DeploymentStatus::Success, 5));
        assert_eq!(registry.len(), 3);
        assert!(registry.get("failed").is_some());

        registry.insert(record("next", DeploymentStatus::Building, 6));
        assert!(registry.get("failed").is_none());
        assert!(registry.get("building-old").is_some());
    }

    #[tokio::test]
    async fn test_mock_provider_is_bounded() {
        let provider = MockProvider::with_capacity(2);
        let first = provider.deploy(&request()).await.expect("deploy");
        let second = provider.deploy(&request()).await.expect("deploy");
        let third = provider.deploy(&request()).await.expect("deploy");
        let remembered = [&first, &second, &third]
            .iter()
            .filter(|d| provider.deployments.read().expect("lock").contains_key(&d.id))
            .count();
        assert_eq!(remembered, 2);
        assert_eq!(provider.status(&third.id).await.expect("status"), third);
    }
}
