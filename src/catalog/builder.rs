//! Composition of independently authored project modules into one catalog
//!
//! Registration accepts projects, releases and curation configs in any
//! order. Nothing is cross-checked until [`CatalogBuilder::finalize`], which
//! re-derives the whole catalog from the raw registrations every time it runs.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::catalog::graph::CorrelationGraph;
use crate::catalog::releases::ReleaseCatalog;
use crate::catalog::snapshot::Catalog;
use crate::error::{CatalogError, FinalizeError};
use crate::model::{Project, ProjectCurationConfig, ProjectId, ProjectRelease};
use crate::registry::ProjectRegistry;

/// A source of project definitions, typically one project module
pub trait ProjectProvider {
    /// Register everything this provider knows about
    fn register(&self, builder: &mut CatalogBuilder) -> Result<(), CatalogError>;
}

#[derive(Debug, Clone)]
struct ReleaseBatch {
    project: ProjectId,
    releases: Vec<ProjectRelease>,
}

#[derive(Debug, Default, Clone)]
pub struct CatalogBuilder {
    registry: ProjectRegistry,
    batches: Vec<ReleaseBatch>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_project(&mut self, project: Project) -> Result<(), CatalogError> {
        self.registry.register_project(project)
    }

    /// Register a batch of releases for a project
    ///
    /// When the project is already registered the batch is validated against
    /// its versioning scheme immediately and rejected as a whole on failure.
    /// Otherwise validation waits for finalize.
    pub fn register_releases(
        &mut self,
        project: impl Into<ProjectId>,
        releases: Vec<ProjectRelease>,
    ) -> Result<(), CatalogError> {
        let project = project.into();

        if self.registry.contains(project.as_str()) {
            ReleaseCatalog::validate_batch(
                &project,
                &releases,
                self.registry.scheme(project.as_str()),
            )?;
        } else {
            debug!(
                "Deferring validation of {} releases for unregistered project {}",
                releases.len(),
                project
            );
        }

        debug!("Registered {} releases for {}", releases.len(), project);
        self.batches.push(ReleaseBatch { project, releases });
        Ok(())
    }

    pub fn register_curation_config(
        &mut self,
        project: impl Into<ProjectId>,
        config: ProjectCurationConfig,
    ) -> Result<(), CatalogError> {
        self.registry.register_curation_config(project.into(), config)
    }

    pub fn register_provider(&mut self, provider: &dyn ProjectProvider) -> Result<(), CatalogError> {
        provider.register(self)
    }

    pub fn registry(&self) -> &ProjectRegistry {
        &self.registry
    }

    /// Build the queryable catalog, failing if any registration is inconsistent
    ///
    /// All errors are collected; none of them is dropped in favour of a
    /// partially resolved graph.
    pub fn finalize(&self) -> Result<Catalog, FinalizeError> {
        let (catalog, errors) = self.finalize_lenient();
        if errors.is_empty() {
            Ok(catalog)
        } else {
            Err(FinalizeError::new(errors))
        }
    }

    /// Build the catalog from whatever is consistent and report the rest
    ///
    /// Rejected release batches and unresolved references are left out of
    /// the returned catalog and listed in the returned errors.
    pub fn finalize_lenient(&self) -> (Catalog, Vec<CatalogError>) {
        let mut errors = self.registry.orphaned_curation_configs();
        let mut reported: HashSet<ProjectId> = errors
            .iter()
            .filter_map(|e| match e {
                CatalogError::UnknownProject { id } => Some(id.clone()),
                _ => None,
            })
            .collect();

        let mut releases = ReleaseCatalog::new();
        for batch in &self.batches {
            if !self.registry.contains(batch.project.as_str()) {
                if reported.insert(batch.project.clone()) {
                    errors.push(CatalogError::UnknownProject {
                        id: batch.project.clone(),
                    });
                }
                continue;
            }

            match ReleaseCatalog::validate_batch(
                &batch.project,
                &batch.releases,
                self.registry.scheme(batch.project.as_str()),
            ) {
                Ok(()) => releases.insert_batch(&batch.project, batch.releases.clone()),
                Err(e) => errors.push(e),
            }
        }
        releases.order_newest_first(&self.registry);

        let (graph, graph_errors) = CorrelationGraph::build(&self.registry, &releases);
        errors.extend(graph_errors);

        info!(
            "Finalized catalog: {} projects, {} releases, {} correlations",
            self.registry.len(),
            releases.len(),
            graph.edge_count()
        );
        if !errors.is_empty() {
            warn!("Finalize found {} inconsistent registration(s)", errors.len());
        }

        (Catalog::new(self.registry.clone(), releases, graph), errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProjectType, ReleaseCycle, ReleaseKey, Versioning, VersioningScheme};

    fn gke() -> Project {
        Project::new(
            "gke",
            "Google Kubernetes Engine (GKE)",
            ProjectType::KubeControlPlaneProvider,
        )
        .with_aliases(["cloud.google.com/gke", "gke"])
        .with_versioning(Versioning {
            scheme: VersioningScheme::Calendar,
            release_cycle: ReleaseCycle::Regular,
            release_interval_days: 90,
            individual_upgrade_recommended: true,
            release_patterns: vec!["<YYYY>-R<MINOR>".to_string()],
        })
    }

    fn kube() -> Project {
        Project::new("kube", "Kubernetes", ProjectType::Kubernetes).with_versioning(Versioning {
            scheme: VersioningScheme::Semantic,
            release_cycle: ReleaseCycle::Regular,
            release_interval_days: 120,
            individual_upgrade_recommended: false,
            release_patterns: vec!["<MAJOR>.<MINOR>.<PATCH>".to_string()],
        })
    }

    fn kube_releases(versions: &[&str]) -> Vec<ProjectRelease> {
        versions
            .iter()
            .map(|v| ProjectRelease::new("kube", *v))
            .collect()
    }

    fn versions(releases: Vec<&ProjectRelease>) -> Vec<String> {
        releases.into_iter().map(|r| r.key().to_string()).collect()
    }

    #[test]
    fn finalize_resolves_gke_release_to_bundled_kube_release() {
        let mut builder = CatalogBuilder::new();
        builder.register_project(gke()).unwrap();
        builder
            .register_releases(
                "gke",
                vec![ProjectRelease::new("gke", "2025-R37").with_related(["kube@1.33.3"])],
            )
            .unwrap();
        builder.register_project(kube()).unwrap();
        builder
            .register_releases("kube", kube_releases(&["1.33.3"]))
            .unwrap();

        let catalog = builder.finalize().unwrap();

        assert_eq!(
            versions(
                catalog
                    .bundled_by(&ReleaseKey::new("gke", "2025-R37"))
                    .unwrap()
            ),
            vec!["kube@1.33.3"]
        );
        assert_eq!(
            versions(catalog.bundlers(&ReleaseKey::new("kube", "1.33.3")).unwrap()),
            vec!["gke@2025-R37"]
        );
    }

    #[test]
    fn finalize_accepts_releases_registered_before_their_project() {
        let mut builder = CatalogBuilder::new();
        builder
            .register_releases(
                "gke",
                vec![ProjectRelease::new("gke", "2025-R37").with_related(["kube@1.33.3"])],
            )
            .unwrap();
        builder
            .register_releases("kube", kube_releases(&["1.33.3"]))
            .unwrap();
        builder.register_project(kube()).unwrap();
        builder.register_project(gke()).unwrap();

        let catalog = builder.finalize().unwrap();

        assert_eq!(catalog.graph().edge_count(), 1);
    }

    #[test]
    fn finalize_validates_deferred_releases_against_scheme() {
        let mut builder = CatalogBuilder::new();
        builder
            .register_releases("gke", vec![ProjectRelease::new("gke", "R37")])
            .unwrap();
        builder.register_project(gke()).unwrap();

        let err = builder.finalize().unwrap_err();

        assert!(matches!(
            err.errors(),
            [CatalogError::InvalidVersionFormat { version, .. }] if version == "R37"
        ));
    }

    #[test]
    fn register_releases_rejects_invalid_version_for_known_project() {
        let mut builder = CatalogBuilder::new();
        builder.register_project(gke()).unwrap();

        let result = builder.register_releases("gke", vec![ProjectRelease::new("gke", "1.33.3")]);

        assert!(matches!(
            result,
            Err(CatalogError::InvalidVersionFormat { .. })
        ));
        let catalog = builder.finalize().unwrap();
        assert_eq!(catalog.list_releases("gke"), Some(vec![]));
    }

    #[test]
    fn finalize_fails_on_dangling_correlation() {
        let mut builder = CatalogBuilder::new();
        builder.register_project(gke()).unwrap();
        builder.register_project(kube()).unwrap();
        builder
            .register_releases(
                "gke",
                vec![ProjectRelease::new("gke", "2025-R37").with_related(["kube@9.9.9"])],
            )
            .unwrap();

        let err = builder.finalize().unwrap_err();

        assert_eq!(
            err.errors(),
            &[CatalogError::DanglingCorrelation {
                from: ReleaseKey::new("gke", "2025-R37"),
                reference: "kube@9.9.9".to_string(),
            }]
        );
    }

    #[test]
    fn finalize_reports_releases_and_curation_of_unregistered_project_once() {
        let mut builder = CatalogBuilder::new();
        builder
            .register_releases("eks", vec![ProjectRelease::new("eks", "1.30")])
            .unwrap();
        builder
            .register_releases("eks", vec![ProjectRelease::new("eks", "1.31")])
            .unwrap();

        let err = builder.finalize().unwrap_err();

        assert_eq!(
            err.errors(),
            &[CatalogError::UnknownProject { id: "eks".into() }]
        );
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut builder = CatalogBuilder::new();
        builder.register_project(gke()).unwrap();
        builder.register_project(kube()).unwrap();
        builder
            .register_releases("kube", kube_releases(&["1.31.11", "1.32.6"]))
            .unwrap();
        builder
            .register_releases(
                "gke",
                vec![
                    ProjectRelease::new("gke", "2025-R36").with_related(["kube@1.31.11", "kube@1.32.6"]),
                    ProjectRelease::new("gke", "2025-R35").with_related(["kube@1.31.11"]),
                ],
            )
            .unwrap();

        let first = builder.finalize().unwrap();
        let second = builder.finalize().unwrap();

        assert_eq!(first.graph(), second.graph());
        assert_eq!(second.graph().edge_count(), 3);
    }

    #[test]
    fn refinalize_after_new_registration_rebuilds_from_scratch() {
        let mut builder = CatalogBuilder::new();
        builder.register_project(gke()).unwrap();
        builder.register_project(kube()).unwrap();
        builder
            .register_releases("kube", kube_releases(&["1.33.2", "1.33.3"]))
            .unwrap();
        builder
            .register_releases(
                "gke",
                vec![ProjectRelease::new("gke", "2025-R37").with_related(["kube@1.33.2"])],
            )
            .unwrap();
        let before = builder.finalize().unwrap();

        // corrected record supersedes the earlier one
        builder
            .register_releases(
                "gke",
                vec![ProjectRelease::new("gke", "2025-R37").with_related(["kube@1.33.3"])],
            )
            .unwrap();
        let after = builder.finalize().unwrap();

        assert_eq!(before.graph().edge_count(), 1);
        assert_eq!(after.graph().edge_count(), 1);
        assert_eq!(
            versions(after.bundlers(&ReleaseKey::new("kube", "1.33.2")).unwrap()),
            Vec::<String>::new()
        );
        assert_eq!(
            versions(after.bundlers(&ReleaseKey::new("kube", "1.33.3")).unwrap()),
            vec!["gke@2025-R37"]
        );
    }

    #[test]
    fn finalize_lenient_keeps_consistent_data() {
        let mut builder = CatalogBuilder::new();
        builder.register_project(gke()).unwrap();
        builder.register_project(kube()).unwrap();
        builder
            .register_releases("kube", kube_releases(&["1.33.3"]))
            .unwrap();
        builder
            .register_releases(
                "gke",
                vec![ProjectRelease::new("gke", "2025-R37").with_related(["kube@1.33.3", "kube@9.9.9"])],
            )
            .unwrap();

        let (catalog, errors) = builder.finalize_lenient();

        assert_eq!(errors.len(), 1);
        assert_eq!(catalog.graph().edge_count(), 1);
        assert!(catalog.get_release("gke", "2025-R37").is_some());
    }

    struct StaticModule {
        project: Project,
        releases: Vec<ProjectRelease>,
    }

    impl ProjectProvider for StaticModule {
        fn register(&self, builder: &mut CatalogBuilder) -> Result<(), CatalogError> {
            builder.register_project(self.project.clone())?;
            builder.register_releases(self.project.id.clone(), self.releases.clone())
        }
    }

    #[test]
    fn register_provider_delegates_to_module() {
        let module = StaticModule {
            project: kube(),
            releases: kube_releases(&["1.33.3", "1.33.10", "1.33.9"]),
        };
        let mut builder = CatalogBuilder::new();

        builder.register_provider(&module).unwrap();
        let catalog = builder.finalize().unwrap();

        assert_eq!(
            versions(catalog.list_releases("kube").unwrap()),
            vec!["kube@1.33.10", "kube@1.33.9", "kube@1.33.3"]
        );
    }

    #[test]
    fn register_provider_rejects_duplicate_module() {
        let module = StaticModule {
            project: kube(),
            releases: vec![],
        };
        let mut builder = CatalogBuilder::new();
        builder.register_provider(&module).unwrap();

        assert_eq!(
            builder.register_provider(&module),
            Err(CatalogError::DuplicateProjectId { id: "kube".into() })
        );
    }
}
