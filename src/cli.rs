use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};

use crate::output::OutputFormat;

/// Color output control
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal capability
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Parser, Debug)]
#[command(name = "ci-config-diff")]
#[command(author, version, about = "Resolve GitLab CI configurations and diff them job by job")]
#[command(long_about = "Expands `include` directives of a GitLab CI configuration, optionally \
    lets the GitLab lint API apply `extends` and `!reference`, and compares two \
    configurations job by job.\n\n\
    Exit codes:\n  \
    0 - Success (or no differences)\n  \
    1 - Differences found (diff --exit-code)\n  \
    2 - Configuration or runtime error")]
pub struct Cli {
    /// Increase output verbosity (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Control color output
    #[arg(long, value_enum, default_value = "auto", global = true)]
    pub color: ColorChoice,

    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Skip loading configuration file
    #[arg(long, global = true)]
    pub no_config: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve includes and print the resulting configuration
    Resolve(ResolveArgs),

    /// Compare two configurations job by job
    Diff(DiffArgs),

    /// Validate a configuration with the GitLab lint API
    Lint(LintArgs),

    /// Generate a default configuration file
    Init(InitArgs),
}

/// Options shared by every command that talks to GitLab.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RemoteArgs {
    /// GitLab project path or id (overrides config)
    #[arg(long)]
    pub project: Option<String>,

    /// Bypass the remote include cache
    #[arg(long)]
    pub no_cache: bool,
}

#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct ResolveArgs {
    /// Entry configuration file (overrides config `input_file`)
    #[arg(short, long)]
    pub input: Option<String>,

    /// Read files as they are at this git revision
    #[arg(long)]
    pub git_ref: Option<String>,

    /// Let the GitLab lint API apply extends and !reference
    #[arg(long)]
    pub lint: bool,

    /// Keep going when the lint API reports errors
    #[arg(long, requires = "lint")]
    pub ignore_errors: bool,

    /// Only keep this job (implies job filtering)
    #[arg(long)]
    pub job: Option<String>,

    /// Keep non-job entries and skip cleaning
    #[arg(long)]
    pub no_clean: bool,

    /// Print jobs sorted by name
    #[arg(long)]
    pub sort_jobs: bool,

    /// Set a global variable (KEY=VALUE, can be repeated)
    #[arg(long = "variable", value_parser = parse_variable)]
    pub variables: Vec<(String, String)>,

    /// Point `changes: compare_to` rules at this ref
    #[arg(long)]
    pub compare_to: Option<String>,

    /// Record each top-level value's source under `_file_path`
    #[arg(long)]
    pub with_provenance: bool,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub remote: RemoteArgs,
}

#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)]
#[command(group(ArgGroup::new("before_side").required(true).args(["before", "before_ref"])))]
#[command(group(ArgGroup::new("after_side").required(true).args(["after", "after_ref"])))]
pub struct DiffArgs {
    /// Old configuration file
    #[arg(long)]
    pub before: Option<String>,

    /// Old git revision of the entry file
    #[arg(long)]
    pub before_ref: Option<String>,

    /// New configuration file
    #[arg(long)]
    pub after: Option<String>,

    /// New git revision of the entry file
    #[arg(long)]
    pub after_ref: Option<String>,

    /// Entry file read at the refs (overrides config `input_file`)
    #[arg(short, long)]
    pub input: Option<String>,

    /// Let the GitLab lint API apply extends and !reference on both sides
    #[arg(long)]
    pub lint: bool,

    /// Keep going when the lint API reports errors
    #[arg(long, requires = "lint")]
    pub ignore_errors: bool,

    /// Only compare this job
    #[arg(long)]
    pub job: Option<String>,

    /// Output format [possible values: text, markdown, json]
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Collapse sections with more jobs than this (overrides config)
    #[arg(long)]
    pub max_detailed: Option<usize>,

    /// Link to the full diff, shown under the markdown summary
    #[arg(long)]
    pub job_url: Option<String>,

    /// Only print the summary
    #[arg(long)]
    pub summary_only: bool,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Exit with code 1 when the configurations differ
    #[arg(long)]
    pub exit_code: bool,

    #[command(flatten)]
    pub remote: RemoteArgs,
}

#[derive(Parser, Debug)]
pub struct LintArgs {
    /// Entry configuration file (overrides config `input_file`)
    #[arg(short, long)]
    pub input: Option<String>,

    /// Read files as they are at this git revision
    #[arg(long)]
    pub git_ref: Option<String>,

    #[command(flatten)]
    pub remote: RemoteArgs,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Output path for the configuration file
    #[arg(short, long, default_value = ".ci-config-diff.toml")]
    pub output: PathBuf,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Parse a `KEY=VALUE` pair. The value may itself contain `=`.
///
/// # Errors
/// Returns a message when there is no `=` or the key is empty.
pub fn parse_variable(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
