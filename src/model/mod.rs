//! Data model shared by the registry, the release catalog and the curation contract

pub mod curation;
pub mod project;
pub mod release;

pub use curation::{
    LinkTemplate, LinkTemplateCurationConfig, LinkType, ProjectCurationConfig,
    ReleaseCurationConfig, SourceScrapeConfig,
};
pub use project::{Project, ProjectId, ProjectType, ReleaseCycle, Versioning, VersioningScheme};
pub use release::{ProjectRelease, ReleaseKey, ReleaseReference};
