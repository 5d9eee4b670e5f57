//! Versioning scheme engine
//!
//! Turns a project's [`Versioning`] descriptor into a [`VersionScheme`] that
//! validates version strings and orders them.
//!
//! # Modules
//!
//! - [`pattern`]: compiles release pattern templates (`<YYYY>-R<MINOR>`) into matchers
//! - [`scheme`]: validation and comparison over the compiled patterns or semver

pub mod pattern;
pub mod scheme;

use std::cmp::Ordering;

use crate::error::VersionError;
use crate::model::Versioning;

pub use pattern::{Placeholder, ReleasePattern};
pub use scheme::{VersionKey, VersionScheme, parse_semver};

/// Check whether `version` is valid under the declared versioning
///
/// A descriptor whose patterns do not compile validates nothing.
pub fn validate(versioning: &Versioning, version: &str) -> bool {
    VersionScheme::from_versioning(versioning)
        .map(|scheme| scheme.validate(version))
        .unwrap_or(false)
}

/// Compare two versions under the declared versioning
pub fn compare(versioning: &Versioning, a: &str, b: &str) -> Result<Ordering, VersionError> {
    VersionScheme::from_versioning(versioning)?.compare(a, b)
}
