//! Project registry
//!
//! Stores project definitions together with their compiled versioning scheme
//! and curation config, and resolves alternate names to project ids.

use std::collections::HashMap;
use std::iter;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::curation::validate_curation_config;
use crate::error::CatalogError;
use crate::model::{Project, ProjectCurationConfig, ProjectId};
use crate::versioning::VersionScheme;

/// Which part of a project a lookup name came from, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum NameKind {
    Id,
    Title,
    Alias,
}

#[derive(Debug, Default, Clone)]
pub struct ProjectRegistry {
    projects: IndexMap<ProjectId, Project>,
    schemes: HashMap<ProjectId, VersionScheme>,
    curation: IndexMap<ProjectId, ProjectCurationConfig>,
    names: HashMap<String, (NameKind, ProjectId)>,
}

impl ProjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a project definition
    ///
    /// Fails with [`CatalogError::DuplicateProjectId`] if the id is taken and
    /// with [`CatalogError::InvalidVersioning`] if a release pattern does not compile.
    pub fn register_project(&mut self, project: Project) -> Result<(), CatalogError> {
        if self.projects.contains_key(&project.id) {
            return Err(CatalogError::DuplicateProjectId {
                id: project.id.clone(),
            });
        }

        let scheme = project
            .versioning
            .as_ref()
            .map(VersionScheme::from_versioning)
            .transpose()
            .map_err(|reason| CatalogError::InvalidVersioning {
                project: project.id.clone(),
                reason,
            })?;

        self.index_names(&project);
        if let Some(scheme) = scheme {
            self.schemes.insert(project.id.clone(), scheme);
        }

        debug!("Registered project {} ({})", project.id, project.title);
        self.projects.insert(project.id.clone(), project);
        Ok(())
    }

    /// Register how new releases of a project are discovered
    ///
    /// The config is validated structurally right away. Whether the project
    /// exists is only checked by [`ProjectRegistry::orphaned_curation_configs`].
    pub fn register_curation_config(
        &mut self,
        id: ProjectId,
        config: ProjectCurationConfig,
    ) -> Result<(), CatalogError> {
        validate_curation_config(&id, &config)?;

        if self.curation.insert(id.clone(), config).is_some() {
            warn!("Curation config for {} replaced by a later registration", id);
        }
        Ok(())
    }

    /// Errors for curation configs whose project never registered
    pub fn orphaned_curation_configs(&self) -> Vec<CatalogError> {
        self.curation
            .keys()
            .filter(|id| !self.projects.contains_key(*id))
            .map(|id| CatalogError::UnknownProject { id: id.clone() })
            .collect()
    }

    pub fn lookup(&self, id: &str) -> Option<&Project> {
        self.projects.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.projects.contains_key(id)
    }

    /// Compiled versioning scheme, if the project declares one
    pub fn scheme(&self, id: &str) -> Option<&VersionScheme> {
        self.schemes.get(id)
    }

    pub fn curation_config(&self, id: &str) -> Option<&ProjectCurationConfig> {
        self.curation.get(id)
    }

    /// Resolve any known name of a project (id, title or alias)
    ///
    /// Matching is exact after trimming and lowercasing.
    pub fn resolve_alias(&self, name: &str) -> Option<&ProjectId> {
        self.names.get(&normalize_name(name)).map(|(_, id)| id)
    }

    /// Projects in registration order
    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.values()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    // Ids win over titles, titles over aliases; within a kind the first project keeps the name.
    fn index_names(&mut self, project: &Project) {
        let names = iter::once((NameKind::Id, project.id.as_str()))
            .chain(iter::once((NameKind::Title, project.title.as_str())))
            .chain(project.aliases.iter().map(|a| (NameKind::Alias, a.as_str())));

        for (kind, name) in names {
            let key = normalize_name(name);
            if key.is_empty() {
                continue;
            }

            match self.names.get(&key).cloned() {
                None => {
                    self.names.insert(key, (kind, project.id.clone()));
                }
                Some((existing_kind, owner)) if kind < existing_kind => {
                    if owner != project.id {
                        warn!(
                            "Name '{}' moves from project {} to {} (stronger match)",
                            key, owner, project.id
                        );
                    }
                    self.names.insert(key, (kind, project.id.clone()));
                }
                Some((_, owner)) if owner != project.id => {
                    warn!(
                        "Name '{}' of project {} is already claimed by {}",
                        key, project.id, owner
                    );
                }
                Some(_) => {}
            }
        }
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
