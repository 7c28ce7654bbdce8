use std::collections::BTreeMap;

use serde::Serialize;

use crate::diff::CiDiff;
use crate::error::Result;

use super::{DiffFormatter, RenderOptions};

pub struct JsonFormatter;

impl JsonFormatter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    summary: Summary,
    #[serde(skip_serializing_if = "Option::is_none")]
    job_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    jobs: Option<Jobs<'a>>,
}

#[derive(Serialize)]
struct Summary {
    removed: usize,
    modified: usize,
    added: usize,
    renamed: usize,
}

#[derive(Serialize)]
struct Jobs<'a> {
    removed: Vec<&'a str>,
    modified: BTreeMap<&'a str, Vec<String>>,
    added: BTreeMap<&'a str, &'a str>,
    renamed: Vec<Rename<'a>>,
}

#[derive(Serialize)]
struct Rename<'a> {
    before: &'a str,
    after: &'a str,
}

impl DiffFormatter for JsonFormatter {
    fn format(&self, diff: &CiDiff, options: &RenderOptions) -> Result<String> {
        let jobs = (!options.summary_only).then(|| Jobs {
            removed: diff.removed().iter().map(String::as_str).collect(),
            modified: diff
                .modified_diffs()
                .iter()
                .map(|(name, lines)| {
                    (
                        name.as_str(),
                        lines.iter().map(ToString::to_string).collect(),
                    )
                })
                .collect(),
            added: diff
                .added_contents()
                .iter()
                .map(|(name, content)| (name.as_str(), content.as_str()))
                .collect(),
            renamed: diff
                .renamed()
                .iter()
                .map(|(before, after)| Rename {
                    before: before.as_str(),
                    after: after.as_str(),
                })
                .collect(),
        });

        let output = JsonOutput {
            summary: Summary {
                removed: diff.removed().len(),
                modified: diff.modified().len(),
                added: diff.added().len(),
                renamed: diff.renamed().len(),
            },
            job_url: options.job_url.as_deref(),
            jobs,
        };

        Ok(serde_json::to_string_pretty(&output)?)
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
