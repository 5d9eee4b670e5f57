//! Staleness of a project's release stream

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::catalog::Catalog;
use crate::model::{ReleaseCycle, Versioning};

/// Whether a project has released within its expected cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Freshness {
    /// A release is not yet overdue
    #[serde(rename_all = "camelCase")]
    Fresh { next_expected: NaiveDate },
    /// No release was registered since `next_expected`
    #[serde(rename_all = "camelCase")]
    Stale {
        next_expected: NaiveDate,
        overdue_days: i64,
    },
    /// Irregular cadence, no versioning or no dated release
    Unknown,
}

/// Compare the last release date against the declared release interval
///
/// The next release is expected `release_interval_days + grace_days` after
/// `last_release`.
pub fn assess(
    versioning: Option<&Versioning>,
    last_release: Option<NaiveDate>,
    today: NaiveDate,
    grace_days: u32,
) -> Freshness {
    let (Some(versioning), Some(last_release)) = (versioning, last_release) else {
        return Freshness::Unknown;
    };
    if versioning.release_cycle == ReleaseCycle::Irregular || versioning.release_interval_days == 0
    {
        return Freshness::Unknown;
    }

    let window = u64::from(versioning.release_interval_days) + u64::from(grace_days);
    let Some(next_expected) = last_release.checked_add_days(Days::new(window)) else {
        return Freshness::Unknown;
    };

    if today <= next_expected {
        Freshness::Fresh { next_expected }
    } else {
        Freshness::Stale {
            next_expected,
            overdue_days: (today - next_expected).num_days(),
        }
    }
}

impl Catalog {
    /// Freshness of a project as of `today`, or None if it is not registered
    ///
    /// Uses the most recent `released_on` date among the project's releases.
    pub fn freshness(&self, id: &str, today: NaiveDate, grace_days: u32) -> Option<Freshness> {
        let project = self.lookup(id)?;
        let last_release = self
            .list_releases(id)?
            .into_iter()
            .filter_map(|r| r.released_on)
            .max();

        Some(assess(
            project.versioning.as_ref(),
            last_release,
            today,
            grace_days,
        ))
    }
}
