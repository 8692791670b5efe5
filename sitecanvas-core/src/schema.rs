//! Stored project documents.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Element;

/// Lifecycle of a project with respect to deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    /// Never deployed, or edited since.
    #[default]
    Draft,
    /// A deployment is in progress.
    Building,
    /// The last deployment succeeded.
    Deployed,
    /// The last deployment failed.
    Failed,
}

impl ProjectStatus {
    /// Wire name of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Building => "building",
            Self::Deployed => "deployed",
            Self::Failed => "failed",
        }
    }
}

/// A saved project: one page of elements plus bookkeeping.
///
/// `elements` round-trip exactly; `status` and `metadata` are carried for
/// callers and never interpreted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    /// Project identifier.
    pub id: String,
    /// Caller id of the owner.
    #[serde(rename = "userId")]
    pub owner: String,
    /// Display title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Deployment status.
    #[serde(default)]
    pub status: ProjectStatus,
    /// Page elements in z-order.
    #[serde(default)]
    pub elements: Vec<Element>,
    /// Opaque caller metadata.
    #[serde(default)]
    pub metadata: Value,
    /// Save counter, bumped on every element save.
    #[serde(default)]
    pub version: u64,
    /// Creation time, milliseconds since the Unix epoch.
    pub created_at: u64,
    /// Last modification time, milliseconds since the Unix epoch.
    pub updated_at: u64,
    /// URL of the latest successful deployment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_url: Option<String>,
}

impl ProjectDocument {
    /// Create a fresh draft document.
    #[must_use]
    pub fn new(id: impl Into<String>, owner: impl Into<String>, project: NewProject, timestamp: u64) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
            title: project.title,
            description: project.description,
            status: ProjectStatus::Draft,
            elements: project.elements,
            metadata: project.metadata,
            version: 0,
            created_at: timestamp,
            updated_at: timestamp,
            deployment_url: None,
        }
    }
}

/// Fields a caller supplies when creating a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    /// Display title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Initial elements.
    #[serde(default)]
    pub elements: Vec<Element>,
    /// Opaque caller metadata.
    #[serde(default)]
    pub metadata: Value,
}

impl NewProject {
    /// A project with just a title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update of a project's descriptive fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectChanges {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl ProjectChanges {
    /// Whether the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.metadata.is_none()
    }
}
