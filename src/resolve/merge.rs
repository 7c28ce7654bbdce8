use crate::document::{Document, Mapping, Node};
use crate::error::{CiDiffError, Result};
use crate::source::Fragment;

const VARIABLES_KEY: &str = "variables";

/// Fold fragments into one document. Top-level keys of later fragments
/// replace earlier ones; a replaced key keeps its first position.
#[must_use]
pub fn merge_fragments(fragments: impl IntoIterator<Item = Fragment>) -> Document {
    let mut merged = Document::new();
    for fragment in fragments {
        for (key, value) in fragment.document {
            merged.insert(key, value);
        }
    }
    merged
}

/// Set global pipeline variables, creating the `variables` mapping if absent.
///
/// # Errors
/// Returns [`CiDiffError::Config`] if `variables` exists but is not a mapping.
pub fn apply_variables(document: &mut Document, variables: &[(String, String)]) -> Result<()> {
    if variables.is_empty() {
        return Ok(());
    }

    let entry = document
        .entry(VARIABLES_KEY.to_string())
        .or_insert_with(|| Node::Mapping(Mapping::new()));
    let map = entry.as_mapping_mut().ok_or_else(|| {
        CiDiffError::Config(format!("top-level {VARIABLES_KEY} is not a mapping"))
    })?;

    for (key, value) in variables {
        map.insert(key.clone(), Node::String(value.clone()));
    }
    Ok(())
}

/// Point every top-level `changes: {compare_to: ..}` rule at `compare_to`.
///
/// Looks at top-level mappings and at mappings directly inside top-level
/// lists (shared rule lists). Returns the number of rules updated.
pub fn apply_compare_to(document: &mut Document, compare_to: &str) -> usize {
    let mut updated = 0;
    for value in document.values_mut() {
        match value {
            Node::Mapping(map) => updated += usize::from(set_compare_to(map, compare_to)),
            Node::Sequence(items) => {
                for map in items.iter_mut().filter_map(Node::as_mapping_mut) {
                    updated += usize::from(set_compare_to(map, compare_to));
                }
            }
            _ => {}
        }
    }
    updated
}

fn set_compare_to(map: &mut Mapping, compare_to: &str) -> bool {
    let Some(target) = map
        .get_mut("changes")
        .and_then(Node::as_mapping_mut)
        .and_then(|changes| changes.get_mut("compare_to"))
    else {
        return false;
    };
    *target = Node::String(compare_to.to_string());
    true
}
