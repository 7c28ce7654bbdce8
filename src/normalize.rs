//! Configuration normalization and job filtering.
//!
//! Runs on merged configurations before diffing: template inheritance has
//! already been applied by the lint service, so `extends` is leftover noise,
//! and `!reference` expansion can leave lists spliced inside lists.

use crate::document::{Document, Node};
use crate::error::{CiDiffError, Result};

const EXTENDS_KEY: &str = "extends";
const JOB_BODY_KEYS: &[&str] = &["script", "trigger"];

/// Delete the `extends` key from every mapping-valued entry.
pub fn remove_extends(document: &mut Document) {
    for body in document.values_mut() {
        if let Some(map) = body.as_mapping_mut() {
            map.shift_remove(EXTENDS_KEY);
        }
    }
}

/// Recursively splice nested sequences into their parent sequence.
/// Mappings and scalars are rebuilt unchanged, key order included.
#[must_use]
pub fn flatten(node: Node) -> Node {
    match node {
        Node::Sequence(items) => {
            let mut flat = Vec::with_capacity(items.len());
            for item in items {
                match flatten(item) {
                    Node::Sequence(inner) => flat.extend(inner),
                    other => flat.push(other),
                }
            }
            Node::Sequence(flat)
        }
        Node::Mapping(map) => Node::Mapping(
            map.into_iter()
                .map(|(key, value)| (key, flatten(value)))
                .collect(),
        ),
        scalar => scalar,
    }
}

/// Flatten every top-level entry of a document.
#[must_use]
pub fn flatten_document(document: Document) -> Document {
    document
        .into_iter()
        .map(|(key, value)| (key, flatten(value)))
        .collect()
}

/// Remove `extends` keys, then flatten nested lists.
#[must_use]
pub fn clean(mut document: Document) -> Document {
    remove_extends(&mut document);
    flatten_document(document)
}

/// True for entries that describe a runnable job: a visible name and a
/// body with a `script` or `trigger`.
#[must_use]
pub fn is_job(name: &str, body: &Node) -> bool {
    !name.starts_with('.') && JOB_BODY_KEYS.iter().any(|key| body.contains_key(key))
}

/// Keep only jobs, optionally narrowed to a single one.
///
/// # Errors
/// Returns [`CiDiffError::JobNotFound`] when `job` is given and absent from the document.
pub fn filter_jobs(document: Document, job: Option<&str>) -> Result<Document> {
    if let Some(name) = job
        && !document.contains_key(name)
    {
        return Err(CiDiffError::JobNotFound(name.to_string()));
    }

    Ok(document
        .into_iter()
        .filter(|(name, body)| is_job(name, body))
        .filter(|(name, _)| job.is_none_or(|wanted| wanted == name))
        .collect())
}

/// Filter then optionally clean, the form configurations are compared in.
///
/// # Errors
/// See [`filter_jobs`].
pub fn prepare_for_diff(document: Document, job: Option<&str>, clean_jobs: bool) -> Result<Document> {
    let jobs = filter_jobs(document, job)?;
    Ok(if clean_jobs { clean(jobs) } else { jobs })
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
