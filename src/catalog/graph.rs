//! Correlation graph resolver
//!
//! Resolves the raw `project@version` references of every release into
//! directed edges ("source bundles target") and keeps an inverted index for
//! the reverse direction. The graph holds only derived data and is rebuilt
//! from scratch on every finalize.

use std::collections::{HashSet, VecDeque};

use indexmap::IndexSet;

use crate::catalog::releases::ReleaseCatalog;
use crate::error::CatalogError;
use crate::model::{ProjectRelease, ReleaseKey, ReleaseReference};
use crate::registry::ProjectRegistry;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CorrelationGraph {
    nodes: IndexSet<ReleaseKey>,
    forward: Vec<Vec<usize>>,
    reverse: Vec<Vec<usize>>,
}

impl CorrelationGraph {
    /// Resolve every reference of every release
    ///
    /// Unresolvable references produce an error and no edge; the caller
    /// decides whether a graph with errors may be published.
    pub fn build(registry: &ProjectRegistry, releases: &ReleaseCatalog) -> (Self, Vec<CatalogError>) {
        let nodes: IndexSet<ReleaseKey> = releases.iter().map(ProjectRelease::key).collect();
        let mut forward = vec![Vec::new(); nodes.len()];
        let mut reverse = vec![Vec::new(); nodes.len()];
        let mut errors = Vec::new();

        for (source, release) in releases.iter().enumerate() {
            for raw in &release.related_project_releases {
                let target = match resolve_reference(registry, releases, release, raw) {
                    Ok(target) => target,
                    Err(e) => {
                        errors.push(e);
                        continue;
                    }
                };

                let Some(target) = nodes.get_index_of(&target.key()) else {
                    continue;
                };
                if !forward[source].contains(&target) {
                    forward[source].push(target);
                    reverse[target].push(source);
                }
            }
        }

        (
            Self {
                nodes,
                forward,
                reverse,
            },
            errors,
        )
    }

    /// Releases directly bundled by `release`, in reference order
    ///
    /// None if `release` is not part of the graph.
    pub fn bundled_by(&self, release: &ReleaseKey) -> Option<Vec<&ReleaseKey>> {
        let index = self.nodes.get_index_of(release)?;
        Some(self.keys(&self.forward[index]))
    }

    /// Releases of any project that directly bundle `release`
    pub fn bundlers(&self, release: &ReleaseKey) -> Option<Vec<&ReleaseKey>> {
        let index = self.nodes.get_index_of(release)?;
        Some(self.keys(&self.reverse[index]))
    }

    /// Everything reachable from `release` over forward edges, breadth first
    ///
    /// Each release is visited once, so cycles terminate. The start release is
    /// never part of the result.
    pub fn transitive_bundled(&self, release: &ReleaseKey) -> Option<Vec<&ReleaseKey>> {
        let start = self.nodes.get_index_of(release)?;
        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        let mut reached = Vec::new();

        while let Some(current) = queue.pop_front() {
            for &next in &self.forward[current] {
                if visited.insert(next) {
                    reached.push(next);
                    queue.push_back(next);
                }
            }
        }

        Some(self.keys(&reached))
    }

    /// Every edge as `(source, target)`
    pub fn edges(&self) -> impl Iterator<Item = (&ReleaseKey, &ReleaseKey)> {
        self.forward
            .iter()
            .enumerate()
            .flat_map(move |(source, targets)| {
                targets.iter().filter_map(move |&target| {
                    Some((self.nodes.get_index(source)?, self.nodes.get_index(target)?))
                })
            })
    }

    pub fn edge_count(&self) -> usize {
        self.forward.iter().map(Vec::len).sum()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn keys(&self, indices: &[usize]) -> Vec<&ReleaseKey> {
        indices
            .iter()
            .filter_map(|&i| self.nodes.get_index(i))
            .collect()
    }
}

/// Resolve one raw reference of `from` to a registered release
///
/// The project half matches a project id first and falls back to alias
/// lookup. Unknown projects and unknown versions are both dangling.
pub fn resolve_reference<'a>(
    registry: &ProjectRegistry,
    releases: &'a ReleaseCatalog,
    from: &ProjectRelease,
    raw: &str,
) -> Result<&'a ProjectRelease, CatalogError> {
    let reference = ReleaseReference::parse(raw)?;
    let dangling = || CatalogError::DanglingCorrelation {
        from: from.key(),
        reference: raw.to_string(),
    };

    let project = if registry.contains(&reference.project) {
        reference.project.as_str()
    } else {
        registry
            .resolve_alias(&reference.project)
            .ok_or_else(dangling)?
            .as_str()
    };

    releases
        .get_release(project, &reference.version)
        .ok_or_else(dangling)
}
