use crate::diff::{CiDiff, DiffLine};
use crate::error::Result;

use super::layout::{self, Counts, SectionStyle};
use super::{DiffFormatter, RenderOptions};

/// Markdown report for merge request comments.
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn collapsible(name: &str, fence: &str, body: impl IntoIterator<Item = String>) -> Vec<String> {
        let mut lines = vec![
            "<details>".to_string(),
            format!("<summary><b>{name}</b></summary>"),
            String::new(),
            format!("```{fence}"),
        ];
        lines.extend(body);
        lines.extend(["```".to_string(), String::new(), "</details>".to_string()]);
        lines
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionStyle for MarkdownFormatter {
    fn section(&self, title: &str, wrap: bool) -> Vec<String> {
        if wrap {
            vec![
                "<details>".to_string(),
                format!("<summary><h3>{title}</h3></summary>"),
            ]
        } else {
            vec![format!("### {title}")]
        }
    }

    fn end_section(&self, wrap: bool) -> Vec<String> {
        if wrap {
            vec!["</details>".to_string()]
        } else {
            Vec::new()
        }
    }

    fn modified_job(&self, name: &str, diff: &[DiffLine]) -> Vec<String> {
        Self::collapsible(name, "diff", diff.iter().map(ToString::to_string))
    }

    fn added_job(&self, name: &str, content: &str) -> Vec<String> {
        Self::collapsible(name, "yaml", content.lines().map(str::to_string))
    }

    fn removed_job(&self, name: &str) -> String {
        format!("- **{name}**")
    }

    fn renamed_job(&self, before: &str, after: &str) -> String {
        format!("- {before} -> **{after}**")
    }

    fn summary(&self, counts: Counts) -> String {
        format!(
            "| Removed | Modified | Added | Renamed |\n\
             | ------- | -------- | ----- | ------- |\n\
             | {} | {} | {} | {} |",
            counts.removed, counts.modified, counts.added, counts.renamed
        )
    }

    fn note(&self, job_url: Option<&str>) -> Vec<String> {
        job_url.map_or_else(Vec::new, |url| {
            vec![
                String::new(),
                format!(":information_source: *Diff available in the [job log]({url}).*"),
            ]
        })
    }

    fn summary_only_notice(&self) -> Option<String> {
        Some(":warning: Diff too large to display on Github".to_string())
    }
}

impl DiffFormatter for MarkdownFormatter {
    fn format(&self, diff: &CiDiff, options: &RenderOptions) -> Result<String> {
        Ok(layout::render(self, diff, options))
    }
}

#[cfg(test)]
#[path = "markdown_tests.rs"]
mod tests;
