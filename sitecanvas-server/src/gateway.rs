//! Project persistence, generation and deployment behind one handle.
//!
//! Route handlers stay thin: they validate input, resolve the caller and
//! call into [`Gateway`], which owns the store, the deployment registry and
//! the hosting provider.

use std::sync::Arc;

use sitecanvas_codegen::{deployment_files, generate_with, GenerateOptions, GeneratedCode, Target};
use sitecanvas_core::{
    Element, NewProject, ProjectChanges, ProjectDocument, ProjectStatus, ProjectStore, StoreError,
};
use tracing::{info, warn};

use crate::deploy::{
    DeploymentRecord, DeploymentRegistry, DeploymentRequest, DeploymentStatus, HostingProvider,
};
use crate::error::{GatewayError, GatewayResult};
use crate::metrics;

/// Shared gateway state. Cheap to clone.
#[derive(Clone)]
pub struct Gateway {
    store: ProjectStore,
    deployments: DeploymentRegistry,
    provider: Arc<dyn HostingProvider>,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("store", &self.store)
            .field("deployments", &self.deployments.len())
            .field("provider", &self.provider.name())
            .finish()
    }
}

impl Gateway {
    /// Create a gateway over a store and a hosting provider.
    #[must_use]
    pub fn new(store: ProjectStore, provider: Arc<dyn HostingProvider>) -> Self {
        Self {
            store,
            deployments: DeploymentRegistry::new(),
            provider,
        }
    }

    /// The underlying project store.
    #[must_use]
    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    /// Name of the configured hosting provider.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Create a project owned by `caller`.
    ///
    /// # Errors
    ///
    /// See [`ProjectStore::create`].
    pub fn create(&self, caller: &str, project: NewProject) -> GatewayResult<ProjectDocument> {
        let doc = self.store.create(caller, project)?;
        metrics::set_projects_total(self.store.len());
        Ok(doc)
    }

    /// Projects owned by `caller`, newest first.
    #[must_use]
    pub fn list(&self, caller: &str) -> Vec<ProjectDocument> {
        self.store.list(caller)
    }

    /// Fetch a whole project document.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Unauthorized`.
    pub fn get(&self, caller: &str, project_id: &str) -> GatewayResult<ProjectDocument> {
        Ok(self.store.get(caller, project_id)?)
    }

    /// Fetch a project's elements.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Unauthorized`.
    pub fn load(&self, caller: &str, project_id: &str) -> GatewayResult<Vec<Element>> {
        Ok(self.store.load(caller, project_id)?)
    }

    /// Save a project's elements and return the stored version.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Unauthorized`, `Conflict` or `BackendUnavailable`.
    pub fn save(
        &self,
        caller: &str,
        project_id: &str,
        elements: Vec<Element>,
        version: Option<u64>,
    ) -> GatewayResult<u64> {
        match self.store.save(caller, project_id, elements, version) {
            Ok(version) => {
                metrics::record_save("ok");
                Ok(version)
            }
            Err(err) => {
                let outcome = if matches!(err, StoreError::Conflict { .. }) {
                    "conflict"
                } else {
                    "error"
                };
                metrics::record_save(outcome);
                Err(err.into())
            }
        }
    }

    /// Update title, description or metadata.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Unauthorized` or `BackendUnavailable`.
    pub fn update_details(
        &self,
        caller: &str,
        project_id: &str,
        changes: ProjectChanges,
    ) -> GatewayResult<ProjectDocument> {
        Ok(self.store.update_details(caller, project_id, changes)?)
    }

    /// Delete a project.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Unauthorized` or `BackendUnavailable`.
    pub fn delete(&self, caller: &str, project_id: &str) -> GatewayResult<()> {
        self.store.delete(caller, project_id)?;
        metrics::set_projects_total(self.store.len());
        Ok(())
    }

    /// Generate code for an ad-hoc element list.
    #[must_use]
    pub fn generate(
        &self,
        elements: &[Element],
        target: Target,
        options: &GenerateOptions,
    ) -> GeneratedCode {
        metrics::record_generation(target.as_str());
        generate_with(elements, target, options)
    }

    /// Generate code for a stored project.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Unauthorized`.
    pub fn generate_project(
        &self,
        caller: &str,
        project_id: &str,
        target: Target,
        options: &GenerateOptions,
    ) -> GatewayResult<GeneratedCode> {
        let elements = self.load(caller, project_id)?;
        Ok(self.generate(&elements, target, options))
    }

    /// Build and publish a project.
    ///
    /// The project is marked `building` before the provider is called and
    /// settles on `deployed`, `building` or `failed` afterwards.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Unauthorized`, `BackendUnavailable` or `Failed`.
    pub async fn deploy(&self, caller: &str, project_id: &str) -> GatewayResult<DeploymentRecord> {
        let doc = self.get(caller, project_id)?;
        let component = self.generate(&doc.elements, Target::React, &GenerateOptions::default());
        let request = DeploymentRequest {
            project_name: doc.title.clone(),
            files: deployment_files(
                &doc.elements,
                &component.code,
                &doc.title,
                &component.dependencies,
            ),
        };

        self.store
            .set_status(caller, project_id, ProjectStatus::Building, None)?;
        info!(
            project = %project_id,
            provider = self.provider.name(),
            files = request.files.len(),
            "Starting deployment"
        );

        let deployment = match self.provider.deploy(&request).await {
            Ok(deployment) => deployment,
            Err(err) => {
                warn!(project = %project_id, error = %err, "Deployment failed");
                let outcome = if err.is_unavailable() { "unavailable" } else { "failed" };
                metrics::record_deployment(self.provider.name(), outcome);
                if let Err(status_err) =
                    self.store
                        .set_status(caller, project_id, ProjectStatus::Failed, None)
                {
                    warn!(project = %project_id, error = %status_err, "Could not mark project failed");
                }
                return Err(err.into());
            }
        };

        let record = DeploymentRecord::new(deployment, project_id, caller, self.provider.name());
        self.deployments.insert(record.clone());
        self.settle_project(&record)?;
        metrics::record_deployment(self.provider.name(), record.status.as_str());
        info!(
            project = %project_id,
            deployment = %record.id,
            status = record.status.as_str(),
            url = %record.url,
            "Deployment recorded"
        );
        Ok(record)
    }

    /// Current state of a deployment started by `caller`.
    ///
    /// A deployment still building is re-checked with the provider and the
    /// project status follows the answer.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Unauthorized` or `BackendUnavailable`.
    pub async fn deployment_status(
        &self,
        caller: &str,
        deployment_id: &str,
    ) -> GatewayResult<DeploymentRecord> {
        let record = self
            .deployments
            .get(deployment_id)
            .ok_or_else(|| GatewayError::NotFound(format!("Deployment not found: {deployment_id}")))?;
        if record.owner != caller {
            return Err(GatewayError::Unauthorized(format!(
                "Not authorized to access deployment {deployment_id}"
            )));
        }
        if record.status != DeploymentStatus::Building {
            return Ok(record);
        }

        let latest = self.provider.status(deployment_id).await?;
        let Some(updated) = self.deployments.refresh(&latest) else {
            return Ok(record);
        };
        if updated.status != record.status {
            self.settle_project(&updated)?;
            metrics::record_deployment(self.provider.name(), updated.status.as_str());
        }
        Ok(updated)
    }

    fn settle_project(&self, record: &DeploymentRecord) -> Result<(), StoreError> {
        let (status, url) = match record.status {
            DeploymentStatus::Success => (ProjectStatus::Deployed, Some(record.url.clone())),
            DeploymentStatus::Building => (ProjectStatus::Building, None),
            DeploymentStatus::Failed => (ProjectStatus::Failed, None),
        };
        match self.store.set_status(&record.owner, &record.project_id, status, url) {
            Ok(_) => Ok(()),
            // The project may have been deleted while the deployment ran.
            Err(StoreError::ProjectNotFound(_)) => Ok(()),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy::{DeployError, MockProvider, ProviderDeployment};
    use async_trait::async_trait;
    use sitecanvas_core::{ElementKind, Position};
    use std::sync::Mutex;

    /// Provider that answers from a script of states.
    struct ScriptedProvider {
        deploy: Mutex<Option<Result<ProviderDeployment, DeployError>>>,
        status: Mutex<Vec<DeploymentStatus>>,
    }

    impl ScriptedProvider {
        fn new(first: Result<ProviderDeployment, DeployError>, later: Vec<DeploymentStatus>) -> Self {
            Self {
                deploy: Mutex::new(Some(first)),
                status: Mutex::new(later),
            }
        }
    }

    #[async_trait]
    impl HostingProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn deploy(&self, _: &DeploymentRequest) -> Result<ProviderDeployment, DeployError> {
            self.deploy
                .lock()
                .expect("lock")
                .take()
                .expect("deploy called once")
        }

        async fn status(&self, id: &str) -> Result<ProviderDeployment, DeployError> {
            let status = self.status.lock().expect("lock").remove(0);
            Ok(ProviderDeployment {
                id: id.to_string(),
                url: "https://shop.example.app".to_string(),
                status,
                created_at: 1,
            })
        }
    }

    fn building() -> ProviderDeployment {
        ProviderDeployment {
            id: "dpl_1".to_string(),
            url: "https://shop.example.app".to_string(),
            status: DeploymentStatus::Building,
            created_at: 1,
        }
    }

    fn gateway_with(provider: Arc<dyn HostingProvider>) -> (Gateway, String) {
        let gateway = Gateway::new(ProjectStore::new(), provider);
        let project = gateway
            .create(
                "owner",
                NewProject {
                    title: "My Shop".to_string(),
                    elements: vec![
                        Element::create(ElementKind::Hero, Position::new(100, 100)),
                        Element::create(ElementKind::Button, Position::new(140, 400)),
                    ],
                    ..NewProject::default()
                },
            )
            .expect("create");
        (gateway, project.id)
    }

    #[tokio::test]
    async fn test_mock_deploy_marks_project_deployed() {
        let (gateway, id) = gateway_with(Arc::new(MockProvider::new()));
        let record = gateway.deploy("owner", &id).await.expect("deploy");
        assert_eq!(record.status, DeploymentStatus::Success);
        assert_eq!(record.provider, "mock");
        assert!(record.url.starts_with("https://my-shop-"));

        let doc = gateway.get("owner", &id).expect("project");
        assert_eq!(doc.status, ProjectStatus::Deployed);
        assert_eq!(doc.deployment_url.as_deref(), Some(record.url.as_str()));
    }

    #[tokio::test]
    async fn test_deploy_requires_owner() {
        let (gateway, id) = gateway_with(Arc::new(MockProvider::new()));
        let err = gateway.deploy("intruder", &id).await.expect_err("unauthorized");
        assert!(matches!(err, GatewayError::Unauthorized(_)));
        let err = gateway.deploy("owner", "missing").await.expect_err("not found");
        assert!(matches!(err, GatewayError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unreachable_provider_marks_failed() {
        let provider = ScriptedProvider::new(
            Err(DeployError::Api {
                status: 503,
                message: "down".to_string(),
            }),
            Vec::new(),
        );
        let (gateway, id) = gateway_with(Arc::new(provider));
        let err = gateway.deploy("owner", &id).await.expect_err("unavailable");
        assert!(matches!(err, GatewayError::BackendUnavailable(_)));
        assert_eq!(
            gateway.get("owner", &id).expect("project").status,
            ProjectStatus::Failed
        );
    }

    #[tokio::test]
    async fn test_building_deployment_settles_on_status_check() {
        let provider = ScriptedProvider::new(
            Ok(building()),
            vec![DeploymentStatus::Building, DeploymentStatus::Success],
        );
        let (gateway, id) = gateway_with(Arc::new(provider));

        let record = gateway.deploy("owner", &id).await.expect("deploy");
        assert_eq!(record.status, DeploymentStatus::Building);
        assert_eq!(gateway.get("owner", &id).expect("doc").status, ProjectStatus::Building);

        let still = gateway.deployment_status("owner", "dpl_1").await.expect("status");
        assert_eq!(still.status, DeploymentStatus::Building);

        let done = gateway.deployment_status("owner", "dpl_1").await.expect("status");
        assert_eq!(done.status, DeploymentStatus::Success);
        let doc = gateway.get("owner", &id).expect("doc");
        assert_eq!(doc.status, ProjectStatus::Deployed);
        assert_eq!(doc.deployment_url.as_deref(), Some("https://shop.example.app"));

        // Settled deployments are not re-checked.
        let again = gateway.deployment_status("owner", "dpl_1").await.expect("status");
        assert_eq!(again.status, DeploymentStatus::Success);

        let err = gateway.deployment_status("intruder", "dpl_1").await.expect_err("owner only");
        assert!(matches!(err, GatewayError::Unauthorized(_)));
    }

    #[test]
    fn test_save_conflict_maps() {
        let (gateway, id) = gateway_with(Arc::new(MockProvider::new()));
        assert_eq!(gateway.save("owner", &id, Vec::new(), Some(5)).expect("save"), 5);
        let err = gateway.save("owner", &id, Vec::new(), Some(5)).expect_err("conflict");
        assert!(matches!(err, GatewayError::Conflict(_)));
    }

    #[test]
    fn test_generate_project() {
        let (gateway, id) = gateway_with(Arc::new(MockProvider::new()));
        let code = gateway
            .generate_project("owner", &id, Target::Html, &GenerateOptions::default())
            .expect("generate");
        assert!(code.code.contains("<button"));
        assert!(code.files.contains_key("index.html"));
    }
}
