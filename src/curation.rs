//! Curation contract validation and the boundary to release scrapers
//!
//! The catalog never fetches pages. A [`CurationExecutor`] does, guided by a
//! project's [`ProjectCurationConfig`], and hands back [`CuratedRelease`]
//! records that [`curate`] registers like any other release batch.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
#[cfg(test)]
use mockall::automock;
use regex::Regex;
use semver::Version;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::catalog::{Catalog, CatalogBuilder};
use crate::error::{CatalogError, CurationError};
use crate::model::{
    Project, ProjectCurationConfig, ProjectId, ProjectRelease, ReleaseReference,
    SourceScrapeConfig,
};
use crate::versioning::parse_semver;

/// Structural validation of a curation config
///
/// Every source needs a target selector, a section pattern that compiles and
/// has a capture group for the release identifier, and an http(s) URL.
/// Link types are a closed enumeration and cannot be out of range here.
pub fn validate_curation_config(
    project: &ProjectId,
    config: &ProjectCurationConfig,
) -> Result<(), CatalogError> {
    let invalid = |reason: String| CatalogError::InvalidCurationConfig {
        project: project.clone(),
        reason,
    };

    if config.series.sources.is_empty() {
        return Err(invalid("series has no sources".to_string()));
    }

    for (index, source) in config.series.sources.iter().enumerate() {
        if source.scrape.target_css_selector.trim().is_empty() {
            return Err(invalid(format!("source {}: target selector is empty", index)));
        }

        let pattern = Regex::new(&source.scrape.section_pattern).map_err(|e| {
            invalid(format!(
                "source {}: section pattern does not compile: {}",
                index, e
            ))
        })?;
        if pattern.captures_len() < 2 {
            return Err(invalid(format!(
                "source {}: section pattern has no capture group",
                index
            )));
        }

        let url = &source.link_template.url_template;
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(invalid(format!(
                "source {}: url template '{}' is not an http(s) URL",
                index, url
            )));
        }
    }

    Ok(())
}

impl SourceScrapeConfig {
    /// Release identifiers found in already-fetched page text, in page order
    pub fn section_ids(&self, text: &str) -> Result<Vec<String>, regex::Error> {
        let pattern = Regex::new(&self.section_pattern)?;
        Ok(pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect())
    }
}

/// A release discovered by a curation executor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CuratedRelease {
    pub version: String,
    #[serde(default)]
    pub related_project_releases: Vec<String>,
    /// Page the release was found on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released_on: Option<NaiveDate>,
}

impl CuratedRelease {
    /// Convert into a catalog release
    ///
    /// References are de-duplicated and sorted by project, then by semantic
    /// version; references whose version is not semver keep their relative
    /// order after the parseable ones.
    pub fn into_release(self, project: &ProjectId) -> ProjectRelease {
        let mut seen = HashSet::new();
        let mut references: Vec<String> = self
            .related_project_releases
            .into_iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty() && seen.insert(r.clone()))
            .collect();
        references.sort_by(|a, b| reference_order(a, b));

        ProjectRelease {
            project: project.clone(),
            version: self.version.trim().to_string(),
            related_project_releases: references,
            released_on: self.released_on,
        }
    }
}

fn reference_order(a: &str, b: &str) -> Ordering {
    sort_key(a).cmp(&sort_key(b))
}

fn sort_key(raw: &str) -> (String, bool, Option<Version>) {
    match ReleaseReference::parse(raw) {
        Ok(reference) => {
            let version = parse_semver(&reference.version);
            (reference.project, version.is_none(), version)
        }
        Err(_) => (raw.to_string(), true, None),
    }
}

/// Executes a project's curation config against external documentation
#[cfg_attr(test, automock)]
pub trait CurationExecutor: Send + Sync {
    /// Discover releases of `project`
    ///
    /// `latest` is the newest release already in the catalog; executors may
    /// stop scanning once they reach it.
    fn discover(
        &self,
        project: &Project,
        config: &ProjectCurationConfig,
        latest: Option<String>,
    ) -> Result<Vec<CuratedRelease>, CurationError>;
}

/// Outcome of one curation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurationReport {
    pub project: ProjectId,
    /// Number of releases the executor returned
    pub discovered: usize,
    /// Versions newly registered with the builder, newest first
    pub registered: Vec<String>,
    /// Validation failure of the discovered batch
    pub rejected: Option<CatalogError>,
    /// Executor failure
    pub failure: Option<String>,
}

impl CurationReport {
    fn new(project: ProjectId) -> Self {
        Self {
            project,
            discovered: 0,
            registered: Vec::new(),
            rejected: None,
            failure: None,
        }
    }
}

/// Discovered versions that are new to the catalog, newest first
///
/// Keeps versions that are valid for the project's scheme, not yet
/// registered and, for ordered schemes, newer than the latest release.
pub fn pending_releases(
    catalog: &Catalog,
    project: &str,
    discovered: &[String],
) -> Result<Vec<String>, CatalogError> {
    if catalog.lookup(project).is_none() {
        return Err(CatalogError::UnknownProject { id: project.into() });
    }

    let scheme = catalog.registry().scheme(project);
    let ordered = scheme.filter(|s| s.is_ordered());
    let latest = catalog.latest_release(project).map(|r| r.version.as_str());
    let mut seen = HashSet::new();

    let mut pending: Vec<String> = discovered
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty() && seen.insert(*v))
        .filter(|v| catalog.get_release(project, v).is_none())
        .filter(|v| {
            let valid = scheme.is_none_or(|s| s.validate(v));
            if !valid {
                debug!("Skipping discovered version {}@{}: not valid for scheme", project, v);
            }
            valid
        })
        .filter(|v| match (ordered, latest) {
            (Some(scheme), Some(latest)) => {
                matches!(scheme.compare(v, latest), Ok(Ordering::Greater))
            }
            _ => true,
        })
        .map(str::to_string)
        .collect();

    if let Some(scheme) = ordered {
        pending.sort_by(|a, b| scheme.compare(b, a).unwrap_or(Ordering::Equal));
    }
    Ok(pending)
}

/// Run `executor` for one project and register what it found
///
/// Executor failures and rejected batches are local to this project: they
/// are logged and reported, never propagated. The caller re-finalizes the
/// builder to publish the new releases.
pub fn curate(
    builder: &mut CatalogBuilder,
    catalog: &Catalog,
    project: &str,
    executor: &dyn CurationExecutor,
) -> Result<CurationReport, CatalogError> {
    let definition = catalog
        .lookup(project)
        .ok_or_else(|| CatalogError::UnknownProject { id: project.into() })?;
    let id = definition.id.clone();
    let mut report = CurationReport::new(id.clone());

    let Some(config) = catalog.curation_config(project) else {
        debug!("No curation config for {}", id);
        return Ok(report);
    };

    let latest = catalog.latest_release(project).map(|r| r.version.clone());
    let curated = match executor.discover(definition, config, latest) {
        Ok(curated) => curated,
        Err(e) => {
            error!("Curation of {} failed: {}", id, e);
            report.failure = Some(e.to_string());
            return Ok(report);
        }
    };
    report.discovered = curated.len();

    let versions: Vec<String> = curated.iter().map(|c| c.version.clone()).collect();
    let pending = pending_releases(catalog, project, &versions)?;

    let mut by_version: HashMap<String, CuratedRelease> = HashMap::new();
    for release in curated {
        by_version
            .entry(release.version.trim().to_string())
            .or_insert(release);
    }
    let releases: Vec<ProjectRelease> = pending
        .iter()
        .filter_map(|v| by_version.remove(v))
        .map(|c| c.into_release(&id))
        .collect();

    if releases.is_empty() {
        info!("No new releases for {}", id);
        return Ok(report);
    }

    match builder.register_releases(id.clone(), releases) {
        Ok(()) => {
            info!("Registered {} new releases for {}: {:?}", pending.len(), id, pending);
            report.registered = pending;
        }
        Err(e) => {
            warn!("Rejected curated releases for {}: {}", id, e);
            report.rejected = Some(e);
        }
    }

    Ok(report)
}
