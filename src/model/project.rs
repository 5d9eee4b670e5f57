//! Project definitions: identity, aliases and versioning descriptor

use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique key of a tracked project (e.g. "gke", "kube")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ProjectId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProjectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Kind of project being tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    /// Upstream Kubernetes itself
    Kubernetes,
    /// Managed Kubernetes control plane (GKE, EKS, AKS)
    KubeControlPlaneProvider,
    /// Kubernetes distribution (OpenShift, k3s, RKE2)
    KubeDistribution,
    /// Component installed into a cluster (CNI, ingress controller, operator)
    KubeAddon,
    /// Any other application with its own release stream
    Application,
}

impl ProjectType {
    /// Returns the string representation of the project type
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Kubernetes => "kubernetes",
            ProjectType::KubeControlPlaneProvider => "kube_control_plane_provider",
            ProjectType::KubeDistribution => "kube_distribution",
            ProjectType::KubeAddon => "kube_addon",
            ProjectType::Application => "application",
        }
    }
}

impl std::str::FromStr for ProjectType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kubernetes" => Ok(ProjectType::Kubernetes),
            "kube_control_plane_provider" => Ok(ProjectType::KubeControlPlaneProvider),
            "kube_distribution" => Ok(ProjectType::KubeDistribution),
            "kube_addon" => Ok(ProjectType::KubeAddon),
            "application" => Ok(ProjectType::Application),
            _ => Err(()),
        }
    }
}

/// How a project numbers its releases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersioningScheme {
    /// Calendar-based identifiers such as `2025-R37`
    Calendar,
    /// Semantic versions such as `1.33.3`
    Semantic,
    Other,
}

/// Whether releases follow a fixed cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseCycle {
    Regular,
    Irregular,
}

/// Versioning descriptor of a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Versioning {
    pub scheme: VersioningScheme,
    pub release_cycle: ReleaseCycle,
    /// Expected number of days between two releases
    #[serde(default)]
    pub release_interval_days: u32,
    /// Policy flag for downstream risk tooling; not interpreted by the catalog
    #[serde(default)]
    pub individual_upgrade_recommended: bool,
    /// Templates like `<YYYY>-R<MINOR>` defining the grammar of valid versions
    #[serde(default)]
    pub release_patterns: Vec<String>,
}

/// A tracked piece of software with its own release stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    /// Alternate names used by alias lookup
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versioning: Option<Versioning>,
}

impl Project {
    pub fn new(id: impl Into<ProjectId>, title: impl Into<String>, project_type: ProjectType) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            tags: BTreeSet::new(),
            project_type,
            aliases: Vec::new(),
            versioning: None,
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_versioning(mut self, versioning: Versioning) -> Self {
        self.versioning = Some(versioning);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(ProjectType::Kubernetes)]
    #[case(ProjectType::KubeControlPlaneProvider)]
    #[case(ProjectType::KubeDistribution)]
    #[case(ProjectType::KubeAddon)]
    #[case(ProjectType::Application)]
    fn project_type_from_str_accepts_as_str(#[case] project_type: ProjectType) {
        assert_eq!(project_type.as_str().parse::<ProjectType>(), Ok(project_type));
    }

    #[test]
    fn project_from_json_fills_optional_fields_with_defaults() {
        let project = serde_json::from_value::<Project>(json!({
            "id": "kube",
            "title": "Kubernetes",
            "type": "kubernetes"
        }))
        .unwrap();

        assert_eq!(project, Project::new("kube", "Kubernetes", ProjectType::Kubernetes));
    }

    #[test]
    fn project_from_json_parses_versioning() {
        let project = serde_json::from_value::<Project>(json!({
            "id": "gke",
            "title": "Google Kubernetes Engine (GKE)",
            "tags": ["kube", "k8s", "gke"],
            "type": "kube_control_plane_provider",
            "aliases": ["cloud.google.com/gke", "gke"],
            "versioning": {
                "scheme": "calendar",
                "releaseCycle": "regular",
                "releaseIntervalDays": 90,
                "individualUpgradeRecommended": true,
                "releasePatterns": ["<YYYY>-R<MINOR>"]
            }
        }))
        .unwrap();

        let versioning = project.versioning.unwrap();
        assert_eq!(versioning.scheme, VersioningScheme::Calendar);
        assert_eq!(versioning.release_cycle, ReleaseCycle::Regular);
        assert_eq!(versioning.release_interval_days, 90);
        assert!(versioning.individual_upgrade_recommended);
        assert_eq!(versioning.release_patterns, vec!["<YYYY>-R<MINOR>"]);
        assert!(project.tags.contains("k8s"));
    }

    #[test]
    fn project_from_json_rejects_unknown_type() {
        let result = serde_json::from_value::<Project>(json!({
            "id": "x",
            "title": "X",
            "type": "mainframe"
        }));

        assert!(result.is_err());
    }
}
