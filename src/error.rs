use std::path::PathBuf;

use thiserror::Error;

use crate::model::{ProjectId, ReleaseKey};

/// Failures of the versioning scheme engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("Version '{version}' matches none of the release patterns {patterns:?}")]
    SchemeMismatch {
        version: String,
        patterns: Vec<String>,
    },

    #[error("Invalid release pattern '{pattern}': {reason}")]
    InvalidReleasePattern { pattern: String, reason: String },
}

/// Configuration-time failures of the registry, release catalog and resolver
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Duplicate project id: {id}")]
    DuplicateProjectId { id: ProjectId },

    #[error("Unknown project: {id}")]
    UnknownProject { id: ProjectId },

    #[error("Project {project} has an invalid versioning descriptor: {reason}")]
    InvalidVersioning {
        project: ProjectId,
        #[source]
        reason: VersionError,
    },

    #[error("Invalid version format for {project}@{version}: {reason}")]
    InvalidVersionFormat {
        project: ProjectId,
        version: String,
        #[source]
        reason: VersionError,
    },

    #[error("Release {project}@{version} is listed more than once in the same batch")]
    DuplicateRelease { project: ProjectId, version: String },

    #[error("Release {found}@{version} was registered under project {expected}")]
    ReleaseProjectMismatch {
        expected: ProjectId,
        found: ProjectId,
        version: String,
    },

    #[error("Invalid reference format: '{reference}' (expected <project>@<version>)")]
    InvalidReferenceFormat { reference: String },

    #[error("Dangling correlation from {from}: '{reference}' does not resolve to a registered release")]
    DanglingCorrelation { from: ReleaseKey, reference: String },

    #[error("Invalid curation config for {project}: {reason}")]
    InvalidCurationConfig { project: ProjectId, reason: String },

    #[error(transparent)]
    Version(#[from] VersionError),
}

/// Every error collected by a single finalize pass
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Catalog finalize failed with {} error(s)", .errors.len())]
pub struct FinalizeError {
    errors: Vec<CatalogError>,
}

impl FinalizeError {
    pub fn new(errors: Vec<CatalogError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[CatalogError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<CatalogError> {
        self.errors
    }
}

/// Failures reported by a curation executor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurationError {
    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),
}

/// Failures while reading project modules from disk
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}
