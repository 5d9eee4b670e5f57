//! Validation and ordering of version strings for a single project

use std::cmp::Ordering;

use semver::Version;

use crate::error::VersionError;
use crate::model::{Versioning, VersioningScheme};
use crate::versioning::pattern::ReleasePattern;

/// Compiled versioning scheme of a project
#[derive(Debug, Clone)]
pub enum VersionScheme {
    /// Versions must match one of the release patterns; ordered by captured fields
    Patterns(Vec<ReleasePattern>),
    /// Semantic versions without declared patterns; ordered by semver precedence
    Semantic,
    /// Any non-empty version; no meaningful order
    Unordered,
}

/// Sort key extracted from a valid version string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionKey {
    Fields(Vec<u64>),
    Semver(Version),
    Raw,
}

impl VersionScheme {
    /// Compile the scheme declared by a project's versioning descriptor
    pub fn from_versioning(versioning: &Versioning) -> Result<Self, VersionError> {
        if !versioning.release_patterns.is_empty() {
            let patterns = versioning
                .release_patterns
                .iter()
                .map(|p| ReleasePattern::compile(p))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(VersionScheme::Patterns(patterns));
        }

        Ok(match versioning.scheme {
            VersioningScheme::Semantic => VersionScheme::Semantic,
            VersioningScheme::Calendar | VersioningScheme::Other => VersionScheme::Unordered,
        })
    }

    /// Whether `compare` gives a meaningful newest-first order
    pub fn is_ordered(&self) -> bool {
        !matches!(self, VersionScheme::Unordered)
    }

    /// Parse a version into its sort key
    ///
    /// Fails with [`VersionError::SchemeMismatch`] when the version does not
    /// belong to the scheme. An empty version belongs to no scheme.
    pub fn parse(&self, version: &str) -> Result<VersionKey, VersionError> {
        if version.trim().is_empty() {
            return Err(self.mismatch(version));
        }

        let key = match self {
            VersionScheme::Patterns(patterns) => patterns
                .iter()
                .find_map(|p| p.capture(version))
                .map(VersionKey::Fields),
            VersionScheme::Semantic => parse_semver(version).map(VersionKey::Semver),
            VersionScheme::Unordered => Some(VersionKey::Raw),
        };
        key.ok_or_else(|| self.mismatch(version))
    }

    fn mismatch(&self, version: &str) -> VersionError {
        let patterns = match self {
            VersionScheme::Patterns(patterns) => {
                patterns.iter().map(|p| p.as_str().to_string()).collect()
            }
            VersionScheme::Semantic => vec!["<MAJOR>.<MINOR>.<PATCH>".to_string()],
            VersionScheme::Unordered => Vec::new(),
        };
        VersionError::SchemeMismatch {
            version: version.to_string(),
            patterns,
        }
    }

    pub fn validate(&self, version: &str) -> bool {
        self.parse(version).is_ok()
    }

    /// Compare two versions of the same project
    ///
    /// Field tuples compare numerically, so `2025-R9` sorts before `2025-R10`.
    /// Equal keys fall back to the raw strings, keeping the order total and
    /// consistent with string equality.
    pub fn compare(&self, a: &str, b: &str) -> Result<Ordering, VersionError> {
        let key_a = self.parse(a)?;
        let key_b = self.parse(b)?;

        let ordering = match (&key_a, &key_b) {
            (VersionKey::Fields(x), VersionKey::Fields(y)) => x.cmp(y),
            (VersionKey::Semver(x), VersionKey::Semver(y)) => x.cmp(y),
            _ => Ordering::Equal,
        };

        Ok(ordering.then_with(|| a.cmp(b)))
    }
}

/// Parse a semantic version, padding partial versions and accepting a `v` prefix
///
/// - "1" -> 1.0.0
/// - "1.33" -> 1.33.0
/// - "v1.33.3" -> 1.33.3
pub fn parse_semver(version: &str) -> Option<Version> {
    let version = version.strip_prefix('v').unwrap_or(version);
    let parts: Vec<&str> = version.split('.').collect();
    let normalized = match parts.len() {
        1 => format!("{}.0.0", parts[0]),
        2 => format!("{}.{}.0", parts[0], parts[1]),
        _ => version.to_string(),
    };
    Version::parse(&normalized).ok()
}
