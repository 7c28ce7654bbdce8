use std::fs;

use crate::cli::InitArgs;
use crate::{CiDiffError, EXIT_SUCCESS, Result};

use super::context::report_error;

#[must_use]
pub fn run_init(args: &InitArgs) -> i32 {
    match run_init_impl(args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report_error(&e),
    }
}

/// Writes a commented default configuration file.
///
/// # Errors
/// Returns an error if the file already exists (without --force) or cannot be written.
pub fn run_init_impl(args: &InitArgs) -> Result<()> {
    let output_path = &args.output;

    if output_path.exists() && !args.force {
        return Err(CiDiffError::Config(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            output_path.display()
        )));
    }

    fs::write(output_path, generate_config_template())?;

    println!("Created configuration file: {}", output_path.display());
    Ok(())
}

#[must_use]
pub const fn generate_config_template() -> &'static str {
    r#"# ci-config-diff configuration file

# Entry configuration file, relative to the project root
input_file = ".gitlab-ci.yml"

[gitlab]
# GitLab instance used by --lint
url = "https://gitlab.com"

# Project path or numeric id (required for --lint)
# project = "group/project"

# Environment variable holding the API token
token_env = "GITLAB_TOKEN"

[render]
# Collapse diff sections with more jobs than this
max_detailed_jobs = 6

[remote]
# Cache include:remote downloads
cache = true
cache_ttl_secs = 3600
"#
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
