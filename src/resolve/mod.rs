//! Include resolution.
//!
//! Expands `include` directives depth-first: every included fragment lands in
//! the ordered list before the fragment that includes it, so folding the list
//! left to right gives "last write wins" with the including file on top.
//! Supports:
//! - Local paths (relative to the project root, `/` prefix allowed)
//! - Remote URLs (http/https)
//! - Paths at a git revision
//! - Circular include detection
//! - Depth limiting

mod include;
mod merge;

pub use include::parse_include;
pub use merge::{apply_compare_to, apply_variables, merge_fragments};

use indexmap::IndexSet;

use crate::document::{Document, Node};
use crate::error::{CiDiffError, Result};
use crate::source::{FileSystem, Fragment, FragmentReader, SourceId};

/// Maximum include nesting depth.
///
/// Depth starts at 0 for the entry file and increments with each nested include.
pub const MAX_INCLUDE_DEPTH: usize = 100;

/// Key under which provenance tagging records a value's originating source.
pub const FILE_PATH_KEY: &str = "_file_path";

const INCLUDE_KEY: &str = "include";

/// Resolves include graphs into ordered fragment lists.
pub struct IncludeResolver<'a, F: FileSystem> {
    reader: &'a FragmentReader<F>,
    git_ref: Option<String>,
    provenance: bool,
    max_depth: usize,
}

impl<'a, F: FileSystem> IncludeResolver<'a, F> {
    #[must_use]
    pub const fn new(reader: &'a FragmentReader<F>) -> Self {
        Self {
            reader,
            git_ref: None,
            provenance: false,
            max_depth: MAX_INCLUDE_DEPTH,
        }
    }

    /// Read included paths from this git revision instead of the working tree.
    #[must_use]
    pub fn with_git_ref(mut self, git_ref: Option<&str>) -> Self {
        self.git_ref = git_ref.map(String::from);
        self
    }

    /// Tag every mapping-valued top-level entry with its source under [`FILE_PATH_KEY`].
    #[must_use]
    pub const fn with_provenance(mut self, provenance: bool) -> Self {
        self.provenance = provenance;
        self
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Expand the include graph rooted at `sources` into an ordered fragment list.
    ///
    /// # Errors
    /// Returns [`CiDiffError::SourceUnavailable`] or [`CiDiffError::Parse`] for
    /// unreadable or malformed fragments, [`CiDiffError::CyclicInclude`] when a
    /// fragment includes one of its ancestors, [`CiDiffError::IncludeTooDeep`]
    /// past the depth limit, and [`CiDiffError::UnsupportedInclude`] for include
    /// forms that cannot be read locally.
    pub fn resolve(&self, sources: &[SourceId]) -> Result<Vec<Fragment>> {
        let mut chain = IndexSet::new();
        let mut fragments = Vec::new();
        for source in sources {
            fragments.extend(self.resolve_source(source, &mut chain, 0)?);
        }
        Ok(fragments)
    }

    /// Expand and merge into one flattened document.
    ///
    /// # Errors
    /// See [`IncludeResolver::resolve`].
    pub fn resolve_document(&self, sources: &[SourceId]) -> Result<Document> {
        let fragments = self.resolve(sources)?;
        tracing::info!(fragments = fragments.len(), "merging resolved fragments");
        Ok(merge_fragments(fragments))
    }

    fn resolve_source(
        &self,
        id: &SourceId,
        chain: &mut IndexSet<String>,
        depth: usize,
    ) -> Result<Vec<Fragment>> {
        if depth > self.max_depth {
            return Err(CiDiffError::IncludeTooDeep {
                depth,
                max: self.max_depth,
                chain: chain.iter().cloned().collect(),
            });
        }

        let key = self.reader.identity(id);
        if !chain.insert(key.clone()) {
            // IndexSet preserves insertion order, so chain shows the actual traversal sequence
            let mut cycle: Vec<String> = chain.iter().cloned().collect();
            cycle.push(key);
            return Err(CiDiffError::CyclicInclude { chain: cycle });
        }

        let mut fragment = self.reader.read(id)?;
        let includes = match fragment.document.shift_remove(INCLUDE_KEY) {
            Some(include) => parse_include(&include, id, self.git_ref.as_deref())?,
            None => Vec::new(),
        };

        if self.provenance {
            tag_provenance(&mut fragment.document, id);
        }

        let mut fragments = Vec::new();
        if !includes.is_empty() {
            tracing::debug!(source = %id, count = includes.len(), depth, "expanding includes");
        }
        for included in &includes {
            fragments.extend(self.resolve_source(included, chain, depth + 1)?);
        }
        fragments.push(fragment);

        chain.pop();
        Ok(fragments)
    }
}

fn tag_provenance(document: &mut Document, id: &SourceId) {
    for value in document.values_mut() {
        if let Some(map) = value.as_mapping_mut() {
            map.insert(FILE_PATH_KEY.to_string(), Node::String(id.to_string()));
        }
    }
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
