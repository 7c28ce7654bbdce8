mod error_output;
mod json;
mod layout;
mod markdown;
mod text;

pub use error_output::{ErrorOutput, print_error_full, print_warning};
pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;

use crate::diff::CiDiff;
use crate::document::{Document, YamlEmitter};
use crate::error::Result;

/// Default number of jobs a section lists before it is collapsed.
pub const DEFAULT_MAX_DETAILED_JOBS: usize = 6;

/// Trait for rendering a configuration diff into various output formats.
pub trait DiffFormatter {
    /// Render the diff into a string without a trailing newline.
    ///
    /// # Errors
    /// Returns an error if the formatting fails.
    fn format(&self, diff: &CiDiff, options: &RenderOptions) -> Result<String>;
}

/// Knobs shared by every formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Sections with more jobs than this are wrapped in a collapsible block.
    pub max_detailed_jobs: usize,
    /// Link to the full log, mentioned under the markdown summary.
    pub job_url: Option<String>,
    /// Emit only the summary.
    pub summary_only: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_detailed_jobs: DEFAULT_MAX_DETAILED_JOBS,
            job_url: None,
            summary_only: false,
        }
    }
}

/// Color output mode for terminal display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Auto-detect: use colors if stdout is a TTY and `NO_COLOR` is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl ColorMode {
    /// Resolve the mode against the current environment for stdout.
    #[must_use]
    pub fn use_colors(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => {
                if std::env::var("NO_COLOR").is_ok() {
                    return false;
                }
                std::io::IsTerminal::is_terminal(&std::io::stdout())
            }
        }
    }
}

/// ANSI color codes
pub(crate) mod ansi {
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const ORANGE: &str = "\x1b[38;5;208m";
    pub const GREY: &str = "\x1b[90m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RESET: &str = "\x1b[0m";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

impl OutputFormat {
    /// Build the formatter for this format.
    #[must_use]
    pub fn formatter(self, color: ColorMode) -> Box<dyn DiffFormatter> {
        match self {
            Self::Text => Box::new(TextFormatter::new(color)),
            Self::Markdown => Box::new(MarkdownFormatter::new()),
            Self::Json => Box::new(JsonFormatter::new()),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "cli" => Ok(Self::Text),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {s}")),
        }
    }
}

/// Print every entry of a configuration as its own key-sorted YAML block,
/// blocks separated by a blank line.
///
/// Job keys are always sorted; `sort_jobs` also sorts the jobs themselves.
#[must_use]
pub fn format_configuration(document: &Document, sort_jobs: bool) -> String {
    let emitter = YamlEmitter::sorted();
    let mut jobs: Vec<_> = document.iter().collect();
    if sort_jobs {
        jobs.sort_by(|a, b| a.0.cmp(b.0));
    }

    jobs.into_iter()
        .map(|(name, body)| emitter.job_to_string(name, body))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
