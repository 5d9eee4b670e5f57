//! Per-project release storage

use std::cmp::Ordering;
use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::warn;

use crate::error::CatalogError;
use crate::model::{ProjectId, ProjectRelease};
use crate::registry::ProjectRegistry;
use crate::versioning::VersionScheme;

/// Releases of every project, keyed by version
///
/// Versions keep registration order until [`ReleaseCatalog::order_newest_first`]
/// sorts projects that declare an ordered scheme.
#[derive(Debug, Default, Clone)]
pub struct ReleaseCatalog {
    releases: IndexMap<ProjectId, IndexMap<String, ProjectRelease>>,
}

impl ReleaseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check a batch of releases before it is stored
    ///
    /// Every release must belong to `project`, appear once in the batch and,
    /// when a scheme is given, match it.
    pub fn validate_batch(
        project: &ProjectId,
        releases: &[ProjectRelease],
        scheme: Option<&VersionScheme>,
    ) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();

        for release in releases {
            if release.project != *project {
                return Err(CatalogError::ReleaseProjectMismatch {
                    expected: project.clone(),
                    found: release.project.clone(),
                    version: release.version.clone(),
                });
            }

            if !seen.insert(release.version.as_str()) {
                return Err(CatalogError::DuplicateRelease {
                    project: project.clone(),
                    version: release.version.clone(),
                });
            }

            let checked = scheme
                .unwrap_or(&VersionScheme::Unordered)
                .parse(&release.version)
                .map(|_| ());
            checked.map_err(|reason| CatalogError::InvalidVersionFormat {
                project: project.clone(),
                version: release.version.clone(),
                reason,
            })?;
        }

        Ok(())
    }

    /// Store an already validated batch; an existing version is superseded
    pub fn insert_batch(&mut self, project: &ProjectId, releases: Vec<ProjectRelease>) {
        let entries = self.releases.entry(project.clone()).or_default();

        for release in releases {
            let version = release.version.clone();
            if entries.insert(version.clone(), release).is_some() {
                warn!(
                    "Release {}@{} superseded by a later registration",
                    project, version
                );
            }
        }
    }

    /// Sort each project's releases newest first using its versioning scheme
    ///
    /// Projects without an ordered scheme keep registration order.
    pub fn order_newest_first(&mut self, registry: &ProjectRegistry) {
        for (project, entries) in self.releases.iter_mut() {
            let Some(scheme) = registry
                .scheme(project.as_str())
                .filter(|scheme| scheme.is_ordered())
            else {
                continue;
            };

            entries.sort_by(|a, _, b, _| scheme.compare(b, a).unwrap_or(Ordering::Equal));
        }
    }

    pub fn get_release(&self, project: &str, version: &str) -> Option<&ProjectRelease> {
        self.releases.get(project)?.get(version)
    }

    /// Releases of one project in catalog order, or None if it has none
    pub fn list_releases(&self, project: &str) -> Option<Vec<&ProjectRelease>> {
        self.releases
            .get(project)
            .map(|entries| entries.values().collect())
    }

    /// Every release, grouped by project
    pub fn iter(&self) -> impl Iterator<Item = &ProjectRelease> {
        self.releases.values().flat_map(|entries| entries.values())
    }

    /// Total number of releases across all projects
    pub fn len(&self) -> usize {
        self.releases.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
