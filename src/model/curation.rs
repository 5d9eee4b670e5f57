//! Curation contract consumed by an external release scraper
//!
//! These types only describe where and how new releases can be discovered.
//! Fetching pages and interpreting them is the job of a curation executor.

use serde::{Deserialize, Serialize};

/// Per-project description of how to discover new releases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCurationConfig {
    pub series: ReleaseCurationConfig,
}

/// Sources describing the project's release series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseCurationConfig {
    pub sources: Vec<LinkTemplateCurationConfig>,
}

/// A page to scrape together with the link it is published under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkTemplateCurationConfig {
    pub scrape: SourceScrapeConfig,
    pub link_template: LinkTemplate,
}

/// Where release sections live on a page and how to identify them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceScrapeConfig {
    /// CSS selector of the element holding the release notes
    #[serde(rename = "targetCSSSelector")]
    pub target_css_selector: String,
    /// Regex whose first capture group is a release identifier
    pub section_pattern: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkTemplate {
    pub url_template: String,
    pub link_type: LinkType,
}

/// Purpose of a curated link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    ProjectReleaseNotes,
    ProjectChangelog,
    ProjectDocumentation,
    ProjectSecurityAdvisories,
    ProjectSourceRepository,
}

impl LinkType {
    /// Returns the string representation of the link type
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::ProjectReleaseNotes => "project_release_notes",
            LinkType::ProjectChangelog => "project_changelog",
            LinkType::ProjectDocumentation => "project_documentation",
            LinkType::ProjectSecurityAdvisories => "project_security_advisories",
            LinkType::ProjectSourceRepository => "project_source_repository",
        }
    }
}

impl std::str::FromStr for LinkType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project_release_notes" => Ok(LinkType::ProjectReleaseNotes),
            "project_changelog" => Ok(LinkType::ProjectChangelog),
            "project_documentation" => Ok(LinkType::ProjectDocumentation),
            "project_security_advisories" => Ok(LinkType::ProjectSecurityAdvisories),
            "project_source_repository" => Ok(LinkType::ProjectSourceRepository),
            _ => Err(()),
        }
    }
}
