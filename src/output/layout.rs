//! Section layout shared by the text and markdown formatters.

use crate::diff::{CiDiff, DiffLine};

use super::RenderOptions;

/// Job counts shown in the summary, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub removed: usize,
    pub modified: usize,
    pub added: usize,
    pub renamed: usize,
}

impl Counts {
    pub fn of(diff: &CiDiff) -> Self {
        Self {
            removed: diff.removed().len(),
            modified: diff.modified().len(),
            added: diff.added().len(),
            renamed: diff.renamed().len(),
        }
    }
}

/// How each piece of the report looks in one output format.
pub trait SectionStyle {
    fn section(&self, title: &str, wrap: bool) -> Vec<String>;

    fn end_section(&self, wrap: bool) -> Vec<String>;

    fn modified_job(&self, name: &str, diff: &[DiffLine]) -> Vec<String>;

    fn added_job(&self, name: &str, content: &str) -> Vec<String>;

    fn removed_job(&self, name: &str) -> String;

    fn renamed_job(&self, before: &str, after: &str) -> String;

    fn summary(&self, counts: Counts) -> String;

    /// Lines after the summary, given the log link.
    fn note(&self, job_url: Option<&str>) -> Vec<String>;

    /// Line replacing the detailed sections in summary-only mode.
    fn summary_only_notice(&self) -> Option<String>;
}

/// Lay out the Modified, Added, Removed and Renamed sections, then the summary.
pub fn render(style: &impl SectionStyle, diff: &CiDiff, options: &RenderOptions) -> String {
    let mut lines: Vec<String> = Vec::new();

    if options.summary_only {
        lines.extend(style.summary_only_notice());
    } else {
        if !diff.modified().is_empty() {
            let wrap = diff.modified().len() > options.max_detailed_jobs;
            lines.extend(style.section("Modified Jobs", wrap));
            for (name, job_diff) in diff.modified_diffs() {
                lines.extend(style.modified_job(name, job_diff));
            }
            lines.extend(style.end_section(wrap));
        }

        if !diff.added().is_empty() {
            separate(&mut lines);
            let wrap = diff.added().len() > options.max_detailed_jobs;
            lines.extend(style.section("Added Jobs", wrap));
            for (name, content) in diff.added_contents() {
                lines.extend(style.added_job(name, content));
            }
            lines.extend(style.end_section(wrap));
        }

        // Removed and renamed entries are one line each and never collapse.
        if !diff.removed().is_empty() {
            separate(&mut lines);
            lines.extend(style.section("Removed Jobs", false));
            lines.extend(diff.removed().iter().map(|name| style.removed_job(name)));
        }

        if !diff.renamed().is_empty() {
            separate(&mut lines);
            lines.extend(style.section("Renamed Jobs", false));
            lines.extend(
                diff.renamed()
                    .iter()
                    .map(|(before, after)| style.renamed_job(before, after)),
            );
        }
    }

    if !diff.is_empty() {
        separate(&mut lines);
        lines.extend(style.section("Changes Summary", false));
        lines.push(style.summary(Counts::of(diff)));
        lines.extend(style.note(options.job_url.as_deref()));
    }

    lines.join("\n")
}

fn separate(lines: &mut Vec<String>) {
    if !lines.is_empty() {
        lines.push(String::new());
    }
}
