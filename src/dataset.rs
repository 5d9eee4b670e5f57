//! Project modules stored as JSON files
//!
//! A module file carries one project, its releases and an optional curation
//! config:
//!
//! ```json
//! {
//!   "project": { "id": "gke", "title": "...", "type": "kube_control_plane_provider" },
//!   "releases": [{ "project": "gke", "version": "2025-R37", "relatedProjectReleases": ["kube@1.33.3"] }],
//!   "curation": { "series": { "sources": [] } }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{CatalogBuilder, ProjectProvider};
use crate::error::{CatalogError, DatasetError};
use crate::model::{Project, ProjectCurationConfig, ProjectRelease};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectModule {
    pub project: Project,
    #[serde(default)]
    pub releases: Vec<ProjectRelease>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curation: Option<ProjectCurationConfig>,
}

impl ProjectProvider for ProjectModule {
    /// Register the project, then its curation config and releases
    ///
    /// A project that fails to register takes nothing else with it. A
    /// rejected curation config or release batch does not stop the other
    /// one from registering; the first of their errors is returned.
    fn register(&self, builder: &mut CatalogBuilder) -> Result<(), CatalogError> {
        let id = self.project.id.clone();
        builder.register_project(self.project.clone())?;

        let curation = match &self.curation {
            Some(curation) => builder.register_curation_config(id.clone(), curation.clone()),
            None => Ok(()),
        };
        let releases = builder.register_releases(id, self.releases.clone());

        curation.and(releases)
    }
}

/// Read a single project module
pub fn load_file(path: &Path) -> Result<ProjectModule, DatasetError> {
    let content = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| DatasetError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Read every `*.json` module in `dir`, ordered by file name
pub fn load_dir(dir: &Path) -> Result<Vec<ProjectModule>, DatasetError> {
    let io_error = |source| DatasetError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(io_error)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<_, _>>()
        .map_err(io_error)?;
    paths.retain(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"));
    paths.sort();

    let modules = paths
        .iter()
        .map(|path| {
            debug!("Loading project module {:?}", path);
            load_file(path)
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!("Loaded {} project modules from {:?}", modules.len(), dir);
    Ok(modules)
}
