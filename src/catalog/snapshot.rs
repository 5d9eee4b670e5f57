//! Finalized, read-only catalog snapshot

use std::cmp::Ordering;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::catalog::builder::CatalogBuilder;
use crate::catalog::graph::CorrelationGraph;
use crate::catalog::releases::ReleaseCatalog;
use crate::error::{CatalogError, FinalizeError};
use crate::model::{
    Project, ProjectCurationConfig, ProjectId, ProjectRelease, ReleaseKey, ReleaseReference,
};
use crate::registry::ProjectRegistry;
use crate::versioning::VersionScheme;

/// Immutable result of a finalize pass
///
/// Every query is read-only, so a `Catalog` can be shared between threads
/// without synchronization. Lookups of unknown projects or releases return
/// `None` instead of an error.
#[derive(Debug, Clone)]
pub struct Catalog {
    registry: ProjectRegistry,
    releases: ReleaseCatalog,
    graph: CorrelationGraph,
}

impl Catalog {
    pub(crate) fn new(
        registry: ProjectRegistry,
        releases: ReleaseCatalog,
        graph: CorrelationGraph,
    ) -> Self {
        Self {
            registry,
            releases,
            graph,
        }
    }

    pub fn registry(&self) -> &ProjectRegistry {
        &self.registry
    }

    pub fn graph(&self) -> &CorrelationGraph {
        &self.graph
    }

    pub fn lookup(&self, id: &str) -> Option<&Project> {
        self.registry.lookup(id)
    }

    pub fn resolve_alias(&self, name: &str) -> Option<&ProjectId> {
        self.registry.resolve_alias(name)
    }

    pub fn curation_config(&self, id: &str) -> Option<&ProjectCurationConfig> {
        self.registry.curation_config(id)
    }

    /// Releases of a project, newest first
    ///
    /// Projects without an ordered versioning scheme list releases in
    /// registration order. None if the project is not registered.
    pub fn list_releases(&self, id: &str) -> Option<Vec<&ProjectRelease>> {
        if !self.registry.contains(id) {
            return None;
        }
        Some(self.releases.list_releases(id).unwrap_or_default())
    }

    pub fn get_release(&self, id: &str, version: &str) -> Option<&ProjectRelease> {
        self.releases.get_release(id, version)
    }

    /// Newest registered release of a project
    pub fn latest_release(&self, id: &str) -> Option<&ProjectRelease> {
        self.releases.list_releases(id)?.into_iter().next()
    }

    /// Look up the release a `project@version` reference points to
    ///
    /// The project half may be an id or any alias.
    pub fn resolve(&self, reference: &ReleaseReference) -> Option<&ProjectRelease> {
        let project = if self.registry.contains(&reference.project) {
            reference.project.as_str()
        } else {
            self.registry.resolve_alias(&reference.project)?.as_str()
        };
        self.releases.get_release(project, &reference.version)
    }

    /// Releases directly bundled by `release`
    pub fn bundled_by(&self, release: &ReleaseKey) -> Option<Vec<&ProjectRelease>> {
        self.graph
            .bundled_by(release)
            .map(|keys| self.releases_for(keys))
    }

    /// Releases of any project that directly bundle `release`
    pub fn bundlers(&self, release: &ReleaseKey) -> Option<Vec<&ProjectRelease>> {
        self.graph
            .bundlers(release)
            .map(|keys| self.releases_for(keys))
    }

    /// Everything `release` bundles directly or indirectly
    pub fn transitive_bundled(&self, release: &ReleaseKey) -> Option<Vec<&ProjectRelease>> {
        self.graph
            .transitive_bundled(release)
            .map(|keys| self.releases_for(keys))
    }

    /// Compare two versions of a registered project
    ///
    /// Projects without versioning compare raw strings.
    pub fn compare(&self, id: &str, a: &str, b: &str) -> Result<Ordering, CatalogError> {
        if !self.registry.contains(id) {
            return Err(CatalogError::UnknownProject { id: id.into() });
        }

        let ordering = match self.registry.scheme(id) {
            Some(scheme) => scheme.compare(a, b)?,
            None => VersionScheme::Unordered.compare(a, b)?,
        };
        Ok(ordering)
    }

    pub fn project_count(&self) -> usize {
        self.registry.len()
    }

    pub fn release_count(&self) -> usize {
        self.releases.len()
    }

    fn releases_for(&self, keys: Vec<&ReleaseKey>) -> Vec<&ProjectRelease> {
        keys.into_iter()
            .filter_map(|key| self.releases.get_release(key.project.as_str(), &key.version))
            .collect()
    }
}

/// Holder of the currently published catalog
///
/// Readers take a cheap `Arc` snapshot. A new snapshot is only published
/// after a complete finalize, so readers never see a graph built from a
/// partial registration set.
#[derive(Debug)]
pub struct SharedCatalog {
    current: RwLock<Arc<Catalog>>,
}

impl SharedCatalog {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    pub fn snapshot(&self) -> Arc<Catalog> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Finalize `builder` and swap the result in
    ///
    /// On failure the previous snapshot stays published.
    pub fn publish(&self, builder: &CatalogBuilder) -> Result<Arc<Catalog>, FinalizeError> {
        let catalog = Arc::new(builder.finalize()?);

        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::clone(&catalog);

        info!(
            "Published catalog snapshot with {} releases",
            catalog.release_count()
        );
        Ok(catalog)
    }
}
