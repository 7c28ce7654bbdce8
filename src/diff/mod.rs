//! Job-level diff between two configurations.

mod lines;

pub use lines::{DiffLine, line_diff};

use std::collections::{BTreeMap, BTreeSet};

use crate::document::{Document, YamlEmitter};

/// Classification of every job across two configuration snapshots.
///
/// `added`, `removed` and `modified` are disjoint, and no name in them is an
/// endpoint of a `renamed` pair. Iteration is in name order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CiDiff {
    added: BTreeSet<String>,
    removed: BTreeSet<String>,
    modified: BTreeSet<String>,
    renamed: BTreeSet<(String, String)>,
    added_contents: BTreeMap<String, String>,
    modified_diffs: BTreeMap<String, Vec<DiffLine>>,
}

impl CiDiff {
    /// Compare two normalized configurations.
    ///
    /// A removed job and an added job with structurally equal bodies are
    /// reported as a rename. Every equal-body pair is recorded, so several
    /// identical jobs renamed at once yield every combination.
    #[must_use]
    pub fn compute(before: &Document, after: &Document) -> Self {
        let mut removed: BTreeSet<String> = before
            .keys()
            .filter(|name| !after.contains_key(*name))
            .cloned()
            .collect();
        let mut added: BTreeSet<String> = after
            .keys()
            .filter(|name| !before.contains_key(*name))
            .cloned()
            .collect();

        let renamed: BTreeSet<(String, String)> = removed
            .iter()
            .flat_map(|old| {
                added
                    .iter()
                    .filter(move |new| before[old] == after[*new])
                    .map(move |new| (old.clone(), new.clone()))
            })
            .collect();
        for (old, new) in &renamed {
            removed.remove(old);
            added.remove(new);
        }

        let modified: BTreeSet<String> = before
            .iter()
            .filter(|(name, body)| after.get(*name).is_some_and(|other| other != *body))
            .map(|(name, _)| name.clone())
            .collect();

        let emitter = YamlEmitter::sorted();

        let added_contents = added
            .iter()
            .map(|name| (name.clone(), emitter.job_to_string(name, &after[name])))
            .collect();

        let modified_diffs = modified
            .iter()
            .map(|name| {
                let old = emitter.job_to_string(name, &before[name]);
                let new = emitter.job_to_string(name, &after[name]);
                (name.clone(), line_diff(&old, &new))
            })
            .collect();

        tracing::debug!(
            added = added.len(),
            removed = removed.len(),
            modified = modified.len(),
            renamed = renamed.len(),
            "computed configuration diff"
        );

        Self {
            added,
            removed,
            modified,
            renamed,
            added_contents,
            modified_diffs,
        }
    }

    #[must_use]
    pub const fn added(&self) -> &BTreeSet<String> {
        &self.added
    }

    #[must_use]
    pub const fn removed(&self) -> &BTreeSet<String> {
        &self.removed
    }

    #[must_use]
    pub const fn modified(&self) -> &BTreeSet<String> {
        &self.modified
    }

    /// `(old name, new name)` pairs.
    #[must_use]
    pub const fn renamed(&self) -> &BTreeSet<(String, String)> {
        &self.renamed
    }

    /// Key-sorted YAML of each added job, as `{name: body}`.
    #[must_use]
    pub const fn added_contents(&self) -> &BTreeMap<String, String> {
        &self.added_contents
    }

    /// Line diff of each modified job.
    #[must_use]
    pub const fn modified_diffs(&self) -> &BTreeMap<String, Vec<DiffLine>> {
        &self.modified_diffs
    }

    /// True when nothing was added, removed, modified or renamed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.modified.is_empty()
            && self.renamed.is_empty()
    }
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;
