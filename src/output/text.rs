use crate::diff::{CiDiff, DiffLine};
use crate::error::Result;

use super::layout::{self, Counts, SectionStyle};
use super::{ColorMode, DiffFormatter, RenderOptions, ansi};

/// Terminal report with ANSI colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    #[must_use]
    pub fn new(mode: ColorMode) -> Self {
        Self {
            use_colors: mode.use_colors(),
        }
    }

    fn paint(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{}", ansi::RESET)
        } else {
            text.to_string()
        }
    }

    fn job(&self, name: &str, color: &str) -> String {
        format!("* {}", self.paint(name, color))
    }
}

impl SectionStyle for TextFormatter {
    fn section(&self, title: &str, _wrap: bool) -> Vec<String> {
        vec![format!("--- {} ---", self.paint(title, ansi::BOLD))]
    }

    fn end_section(&self, _wrap: bool) -> Vec<String> {
        Vec::new()
    }

    fn modified_job(&self, name: &str, diff: &[DiffLine]) -> Vec<String> {
        let mut lines = vec![self.job(name, ansi::ORANGE)];
        lines.extend(diff.iter().map(|line| {
            let rendered = line.to_string();
            match line {
                DiffLine::Added(_) => self.paint(&rendered, ansi::GREEN),
                DiffLine::Removed(_) => self.paint(&rendered, ansi::RED),
                DiffLine::Context(_) => rendered,
            }
        }));
        lines
    }

    fn added_job(&self, name: &str, content: &str) -> Vec<String> {
        let mut lines = vec![self.job(name, ansi::GREEN), String::new()];
        lines.extend(content.lines().map(|line| self.paint(line, ansi::GREY)));
        lines.push(String::new());
        lines
    }

    fn removed_job(&self, name: &str) -> String {
        self.job(name, ansi::RED)
    }

    fn renamed_job(&self, before: &str, after: &str) -> String {
        format!(
            "* {} -> {}",
            self.paint(before, ansi::GREY),
            self.paint(after, ansi::BLUE)
        )
    }

    fn summary(&self, counts: Counts) -> String {
        format!(
            "{} {} | {} {} | {} {} | {} {}",
            counts.removed,
            self.paint("removed", ansi::RED),
            counts.modified,
            self.paint("modified", ansi::ORANGE),
            counts.added,
            self.paint("added", ansi::GREEN),
            counts.renamed,
            self.paint("renamed", ansi::BLUE),
        )
    }

    fn note(&self, _job_url: Option<&str>) -> Vec<String> {
        Vec::new()
    }

    fn summary_only_notice(&self) -> Option<String> {
        None
    }
}

impl DiffFormatter for TextFormatter {
    fn format(&self, diff: &CiDiff, options: &RenderOptions) -> Result<String> {
        Ok(layout::render(self, diff, options))
    }
}

#[cfg(test)]
impl TextFormatter {
    pub(crate) const fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
