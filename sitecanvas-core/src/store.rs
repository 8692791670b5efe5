//! Shared project storage for the HTTP gateway.
//!
//! Provides a thread-safe [`ProjectStore`] that can be shared across request
//! handlers. With a data directory configured every project is mirrored to a
//! JSON file; a mutation is only committed in memory once its file is written.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::schema::{NewProject, ProjectChanges, ProjectDocument, ProjectStatus};
use crate::{Canvas, Element};

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested project does not exist.
    #[error("Project not found: {0}")]
    ProjectNotFound(String),
    /// The caller does not own the project.
    #[error("Not authorized to access project {0}")]
    Unauthorized(String),
    /// The persistence backend could not be reached or written.
    #[error("Storage backend unavailable: {0}")]
    BackendUnavailable(String),
    /// The save was based on an outdated version.
    #[error("Version conflict: stored version is {stored}, save carried {attempted}")]
    Conflict {
        /// Version currently stored.
        stored: u64,
        /// Version the caller sent.
        attempted: u64,
    },
    /// The element list breaks a canvas invariant.
    #[error("Invalid elements: {0}")]
    InvalidElements(String),
    /// An I/O error occurred during persistence.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Thread-safe project storage keyed by project id.
///
/// # Example
///
/// ```
/// use sitecanvas_core::schema::NewProject;
/// use sitecanvas_core::store::ProjectStore;
/// use sitecanvas_core::{Element, ElementKind};
///
/// let store = ProjectStore::new();
/// let project = store.create("user-1", NewProject::titled("Landing")).unwrap();
///
/// let elements = vec![Element::new(ElementKind::Hero)];
/// let version = store.save("user-1", &project.id, elements.clone(), None).unwrap();
/// assert_eq!(version, 1);
/// assert_eq!(store.load("user-1", &project.id).unwrap(), elements);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProjectStore {
    projects: Arc<RwLock<HashMap<String, ProjectDocument>>>,
    /// Optional data directory for filesystem persistence.
    data_dir: Option<PathBuf>,
}

impl ProjectStore {
    /// Create an in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with filesystem persistence.
    ///
    /// Projects are saved as JSON files in `data_dir`. The directory is
    /// created if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self {
            projects: Arc::default(),
            data_dir: Some(data_dir),
        })
    }

    /// Directory projects are persisted to, if any.
    #[must_use]
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// Load every persisted project from the data directory.
    ///
    /// Files that fail to parse are skipped with a warning. Returns the ids
    /// that were loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if no data directory is configured or it can't be read.
    pub fn load_all(&self) -> Result<Vec<String>, StoreError> {
        let data_dir = self
            .data_dir
            .as_ref()
            .ok_or_else(|| StoreError::BackendUnavailable("No data directory configured".into()))?;

        let mut loaded = Vec::new();
        let mut projects = self.projects.write().unwrap_or_else(PoisonError::into_inner);
        for entry in std::fs::read_dir(data_dir)? {
            let path = entry?.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            let doc = std::fs::read_to_string(&path)
                .map_err(StoreError::Io)
                .and_then(|contents| {
                    serde_json::from_str::<ProjectDocument>(&contents)
                        .map_err(|e| StoreError::Serialization(e.to_string()))
                });
            match doc {
                Ok(doc) => {
                    loaded.push(doc.id.clone());
                    projects.insert(doc.id.clone(), doc);
                }
                Err(e) => warn!("Skipping unreadable project file {}: {e}", path.display()),
            }
        }
        info!(count = loaded.len(), "Loaded persisted projects");
        Ok(loaded)
    }

    /// Create a draft project owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidElements`] if the initial elements break a
    /// canvas invariant, or [`StoreError::BackendUnavailable`] if it can't be
    /// persisted.
    pub fn create(&self, owner: &str, project: NewProject) -> Result<ProjectDocument, StoreError> {
        let mut project = project;
        project.elements = normalize(project.elements)?;
        let doc = ProjectDocument::new(
            Uuid::new_v4().to_string(),
            owner,
            project,
            current_timestamp_ms(),
        );

        let mut projects = self.projects.write().unwrap_or_else(PoisonError::into_inner);
        self.persist(&doc)?;
        projects.insert(doc.id.clone(), doc.clone());
        info!(project = %doc.id, owner, "Created project");
        Ok(doc)
    }

    /// Projects owned by `owner`, most recently updated first.
    #[must_use]
    pub fn list(&self, owner: &str) -> Vec<ProjectDocument> {
        let projects = self.projects.read().unwrap_or_else(PoisonError::into_inner);
        let mut owned: Vec<ProjectDocument> = projects
            .values()
            .filter(|doc| doc.owner == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        owned
    }

    /// Fetch a project.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ProjectNotFound`] or [`StoreError::Unauthorized`].
    pub fn get(&self, owner: &str, id: &str) -> Result<ProjectDocument, StoreError> {
        let projects = self.projects.read().unwrap_or_else(PoisonError::into_inner);
        let doc = projects
            .get(id)
            .ok_or_else(|| StoreError::ProjectNotFound(id.to_string()))?;
        authorize(doc, owner)?;
        Ok(doc.clone())
    }

    /// Fetch a project's elements.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ProjectNotFound`] or [`StoreError::Unauthorized`].
    pub fn load(&self, owner: &str, id: &str) -> Result<Vec<Element>, StoreError> {
        self.get(owner, id).map(|doc| doc.elements)
    }

    /// Replace a project's elements and return the new version.
    ///
    /// With `version` set, the save is rejected unless it is newer than the
    /// stored version, and the stored version becomes `version`. Without it
    /// the save always wins and the version is bumped by one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ProjectNotFound`], [`StoreError::Unauthorized`],
    /// [`StoreError::Conflict`], [`StoreError::InvalidElements`] or
    /// [`StoreError::BackendUnavailable`].
    pub fn save(
        &self,
        owner: &str,
        id: &str,
        elements: Vec<Element>,
        version: Option<u64>,
    ) -> Result<u64, StoreError> {
        let elements = normalize(elements)?;
        let doc = self.modify(owner, id, |doc| {
            let next = match version {
                Some(attempted) if attempted <= doc.version => {
                    return Err(StoreError::Conflict {
                        stored: doc.version,
                        attempted,
                    });
                }
                Some(attempted) => attempted,
                None => doc.version.saturating_add(1),
            };
            doc.elements = elements;
            doc.version = next;
            Ok(())
        })?;
        info!(project = %id, version = doc.version, elements = doc.elements.len(), "Saved project");
        Ok(doc.version)
    }

    /// Update a project's title, description or metadata.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ProjectNotFound`], [`StoreError::Unauthorized`] or
    /// [`StoreError::BackendUnavailable`].
    pub fn update_details(
        &self,
        owner: &str,
        id: &str,
        changes: ProjectChanges,
    ) -> Result<ProjectDocument, StoreError> {
        self.modify(owner, id, |doc| {
            if let Some(title) = changes.title {
                doc.title = title;
            }
            if let Some(description) = changes.description {
                doc.description = description;
            }
            if let Some(metadata) = changes.metadata {
                doc.metadata = metadata;
            }
            Ok(())
        })
    }

    /// Record a deployment outcome on a project.
    ///
    /// The deployment URL is only replaced when one is given.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ProjectNotFound`], [`StoreError::Unauthorized`] or
    /// [`StoreError::BackendUnavailable`].
    pub fn set_status(
        &self,
        owner: &str,
        id: &str,
        status: ProjectStatus,
        deployment_url: Option<String>,
    ) -> Result<ProjectDocument, StoreError> {
        debug!(project = %id, status = status.as_str(), "Updating project status");
        self.modify(owner, id, |doc| {
            doc.status = status;
            if deployment_url.is_some() {
                doc.deployment_url = deployment_url;
            }
            Ok(())
        })
    }

    /// Delete a project and its file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ProjectNotFound`], [`StoreError::Unauthorized`] or
    /// [`StoreError::BackendUnavailable`] if the file can't be removed.
    pub fn delete(&self, owner: &str, id: &str) -> Result<(), StoreError> {
        let mut projects = self.projects.write().unwrap_or_else(PoisonError::into_inner);
        let doc = projects
            .get(id)
            .ok_or_else(|| StoreError::ProjectNotFound(id.to_string()))?;
        authorize(doc, owner)?;

        if let Some(path) = self.file_path(id) {
            if path.exists() {
                std::fs::remove_file(&path).map_err(|e| {
                    warn!("Failed to delete project file {}: {e}", path.display());
                    StoreError::BackendUnavailable(e.to_string())
                })?;
            }
        }
        projects.remove(id);
        info!(project = %id, "Deleted project");
        Ok(())
    }

    /// Number of stored projects across all owners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if the store holds no projects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply `f` to a copy of the project, persist it, then commit it.
    fn modify<F>(&self, owner: &str, id: &str, f: F) -> Result<ProjectDocument, StoreError>
    where
        F: FnOnce(&mut ProjectDocument) -> Result<(), StoreError>,
    {
        let mut projects = self.projects.write().unwrap_or_else(PoisonError::into_inner);
        let current = projects
            .get(id)
            .ok_or_else(|| StoreError::ProjectNotFound(id.to_string()))?;
        authorize(current, owner)?;

        let mut next = current.clone();
        f(&mut next)?;
        next.updated_at = current_timestamp_ms().max(current.updated_at);

        self.persist(&next)?;
        projects.insert(id.to_string(), next.clone());
        Ok(next)
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    fn file_path(&self, id: &str) -> Option<PathBuf> {
        self.data_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.json", sanitize_filename(id))))
    }

    /// Write a project to disk as JSON.
    ///
    /// No-op if the store was created without a data directory.
    fn persist(&self, doc: &ProjectDocument) -> Result<(), StoreError> {
        let Some(path) = self.file_path(&doc.id) else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(doc)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        std::fs::write(&path, json).map_err(|e| {
            warn!("Failed to persist project {} to {}: {e}", doc.id, path.display());
            StoreError::BackendUnavailable(e.to_string())
        })
    }
}

fn authorize(doc: &ProjectDocument, owner: &str) -> Result<(), StoreError> {
    if doc.owner == owner {
        Ok(())
    } else {
        Err(StoreError::Unauthorized(doc.id.clone()))
    }
}

fn normalize(elements: Vec<Element>) -> Result<Vec<Element>, StoreError> {
    Canvas::from_elements(elements)
        .map(Canvas::into_elements)
        .map_err(|e| StoreError::InvalidElements(e.to_string()))
}

/// Sanitize a project ID for use as a filename.
///
/// Replaces any character that is not alphanumeric, `-`, or `_` with `_`.
fn sanitize_filename(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Get the current Unix timestamp in milliseconds.
#[must_use]
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| {
        #[allow(clippy::cast_possible_truncation)]
        {
            d.as_millis() as u64
        }
    })
}
