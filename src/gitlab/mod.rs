//! GitLab API access: CI lint, commits and pipelines.
//!
//! The lint endpoint is the only thing that knows how to apply `extends`,
//! expand `!reference` tags and resolve server-side includes, so fully
//! merged configurations always come from it.

mod client;
mod retry;

pub use client::{Commit, GitlabClient, Pipeline};
pub use retry::{PipelineApi, RetryPolicy, refresh_pipeline, with_retry};

use serde::Deserialize;

use crate::document::{Document, YamlEmitter, parse_document};
use crate::error::{CiDiffError, Result};

/// Source label used when parsing lint output.
const MERGED_SOURCE: &str = "ci lint merged_yaml";

/// Outcome of a CI lint request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LintResult {
    pub valid: bool,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub merged_yaml: Option<String>,
}

/// Validates and merges a configuration.
pub trait CiLinter {
    /// Lint raw YAML content.
    ///
    /// # Errors
    /// Returns an error if the lint service cannot be reached.
    fn lint(&self, content: &str) -> Result<LintResult>;
}

/// Send a resolved configuration through the linter and parse the merged
/// result, with `extends` and `!reference` applied.
///
/// # Errors
/// Returns [`CiDiffError::InvalidConfiguration`] when the linter reports the
/// configuration as invalid and `ignore_errors` is false, and [`CiDiffError::Api`]
/// when no merged YAML comes back.
pub fn full_configuration(
    linter: &dyn CiLinter,
    document: &Document,
    ignore_errors: bool,
) -> Result<Document> {
    let content = YamlEmitter::default().mapping_to_string(document);
    let result = linter.lint(&content)?;

    if !result.valid {
        let errors = result.errors.join("; ");
        if !ignore_errors {
            return Err(CiDiffError::InvalidConfiguration(errors));
        }
        tracing::warn!(%errors, "ignoring lint errors");
    }
    for warning in &result.warnings {
        tracing::debug!(%warning, "lint warning");
    }

    let merged = result
        .merged_yaml
        .ok_or_else(|| CiDiffError::Api("lint response carries no merged_yaml".to_string()))?;
    parse_document(&merged, MERGED_SOURCE)
}

/// Read an API token from the named environment variable.
///
/// # Errors
/// Returns [`CiDiffError::MissingToken`] when the variable is unset or empty.
pub fn token_from_env(var: &str) -> Result<String> {
    match std::env::var(var) {
        Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(CiDiffError::MissingToken(var.to_string())),
    }
}

#[cfg(test)]
#[path = "gitlab_tests.rs"]
mod tests;
