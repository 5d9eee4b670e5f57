//! Releases and the `project@version` correlation reference format

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::model::project::ProjectId;

/// One published iteration of a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRelease {
    pub project: ProjectId,
    pub version: String,
    /// Raw references of the form `<projectID>@<version>`
    #[serde(default)]
    pub related_project_releases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released_on: Option<NaiveDate>,
}

impl ProjectRelease {
    pub fn new(project: impl Into<ProjectId>, version: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            version: version.into(),
            related_project_releases: Vec::new(),
            released_on: None,
        }
    }

    pub fn with_related<I, S>(mut self, references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.related_project_releases = references.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_released_on(mut self, date: NaiveDate) -> Self {
        self.released_on = Some(date);
        self
    }

    pub fn key(&self) -> ReleaseKey {
        ReleaseKey::new(self.project.clone(), self.version.clone())
    }
}

/// Identity of a registered release: `(project, version)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReleaseKey {
    pub project: ProjectId,
    pub version: String,
}

impl ReleaseKey {
    pub fn new(project: impl Into<ProjectId>, version: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for ReleaseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.project, self.version)
    }
}

/// Parsed but unresolved `project@version` reference
///
/// The project half is a name, not yet a [`ProjectId`]: it may be an alias and
/// is only resolved against the registry at finalize time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseReference {
    pub project: String,
    pub version: String,
}

impl ReleaseReference {
    /// Split a raw reference on its last `@`
    ///
    /// A missing `@`, an empty project/version half or whitespace around
    /// either half is reported as [`CatalogError::InvalidReferenceFormat`].
    pub fn parse(reference: &str) -> Result<Self, CatalogError> {
        let invalid = || CatalogError::InvalidReferenceFormat {
            reference: reference.to_string(),
        };

        let (project, version) = reference.rsplit_once('@').ok_or_else(invalid)?;
        let malformed = |half: &str| half.is_empty() || half.trim() != half;
        if malformed(project) || malformed(version) {
            return Err(invalid());
        }

        Ok(Self {
            project: project.to_string(),
            version: version.to_string(),
        })
    }
}

impl fmt::Display for ReleaseReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.project, self.version)
    }
}

impl std::str::FromStr for ReleaseReference {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
