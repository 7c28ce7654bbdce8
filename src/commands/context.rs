use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::{Cli, ColorChoice, RemoteArgs};
use crate::config::{Config, ConfigLoader, FileConfigLoader};
use crate::document::Document;
use crate::error::{CiDiffError, Result};
use crate::gitlab::{CiLinter, GitlabClient, full_configuration, token_from_env};
use crate::output::{ColorMode, print_error_full};
use crate::resolve::{IncludeResolver, apply_compare_to, apply_variables};
use crate::source::{FetchPolicy, FragmentReader, GixObjects, RemoteCache, SourceId};
use crate::EXIT_CONFIG_ERROR;

#[must_use]
pub const fn color_choice_to_mode(choice: ColorChoice) -> ColorMode {
    match choice {
        ColorChoice::Auto => ColorMode::Auto,
        ColorChoice::Always => ColorMode::Always,
        ColorChoice::Never => ColorMode::Never,
    }
}

/// Load the tool configuration, honoring `--config` and `--no-config`.
///
/// # Errors
/// Returns an error if a configuration file exists but is invalid.
pub fn load_config(config_path: Option<&Path>, no_config: bool) -> Result<Config> {
    if no_config {
        return Ok(Config::default());
    }

    let loader = FileConfigLoader::new();
    config_path.map_or_else(|| loader.load(), |path| loader.load_from_path(path))
}

/// Print an error with a hint and return the matching exit code.
#[must_use]
pub fn report_error(error: &CiDiffError) -> i32 {
    print_error_full(error.error_type(), &error.to_string(), None, suggestion(error));
    EXIT_CONFIG_ERROR
}

#[must_use]
pub const fn suggestion(error: &CiDiffError) -> Option<&'static str> {
    match error {
        CiDiffError::MissingToken(_) => {
            Some("Export a GitLab access token with the api scope, or drop --lint")
        }
        CiDiffError::JobNotFound(_) => Some("Check the job name, or drop --job"),
        CiDiffError::CyclicInclude { .. } => Some("Remove one of the include entries in the cycle"),
        CiDiffError::Config(_) | CiDiffError::ConfigParse(_) => {
            Some("Check .ci-config-diff.toml, or pass --no-config")
        }
        CiDiffError::Git(_) => Some("Run inside a git repository, or read files from disk"),
        CiDiffError::UnsupportedInclude { .. } => Some("Use --lint to let GitLab resolve it"),
        _ => None,
    }
}

/// Everything a command needs besides its own arguments.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: Config,
    pub color: ColorMode,
    pub quiet: bool,
    /// Directory local include paths are resolved against.
    pub root: PathBuf,
}

/// One configuration to load and resolve.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadRequest<'a> {
    pub input: &'a str,
    pub git_ref: Option<&'a str>,
    pub variables: &'a [(String, String)],
    pub compare_to: Option<&'a str>,
    pub provenance: bool,
}

impl CommandContext {
    #[must_use]
    pub fn new(config: Config, root: impl Into<PathBuf>) -> Self {
        Self {
            config,
            color: ColorMode::Auto,
            quiet: false,
            root: root.into(),
        }
    }

    /// # Errors
    /// Returns an error if the configuration file cannot be loaded.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = load_config(cli.config.as_deref(), cli.no_config)?;
        Ok(Self {
            config,
            color: color_choice_to_mode(cli.color),
            quiet: cli.quiet,
            root: PathBuf::from("."),
        })
    }

    /// The entry file: the CLI value when given, else the configured one.
    #[must_use]
    pub fn input<'a>(&'a self, input: Option<&'a str>) -> &'a str {
        input.unwrap_or(&self.config.input_file)
    }

    /// # Errors
    /// Returns [`CiDiffError::Git`] when a git ref is requested outside a repository.
    pub fn reader(&self, git_ref: Option<&str>, remote: &RemoteArgs) -> Result<FragmentReader> {
        let cache = if self.config.remote.cache {
            RemoteCache::default_location(Duration::from_secs(self.config.remote.cache_ttl_secs))
        } else {
            None
        };
        let policy = if remote.no_cache {
            FetchPolicy::Fresh
        } else {
            FetchPolicy::Normal
        };

        let reader = FragmentReader::new()
            .with_root(&self.root)
            .with_cache(cache, policy);
        if git_ref.is_some() {
            Ok(reader.with_git(GixObjects::discover(&self.root)?))
        } else {
            Ok(reader)
        }
    }

    /// Resolve includes, then apply variable and `compare_to` overrides.
    ///
    /// # Errors
    /// Propagates read, parse and include errors.
    pub fn resolve(&self, request: &LoadRequest<'_>, remote: &RemoteArgs) -> Result<Document> {
        let reader = self.reader(request.git_ref, remote)?;
        let resolver = IncludeResolver::new(&reader)
            .with_git_ref(request.git_ref)
            .with_provenance(request.provenance);

        let mut document =
            resolver.resolve_document(&[SourceId::parse(request.input, request.git_ref)])?;
        apply_variables(&mut document, request.variables)?;
        if let Some(compare_to) = request.compare_to {
            let updated = apply_compare_to(&mut document, compare_to);
            tracing::info!(updated, compare_to, "rewrote compare_to rules");
        }
        Ok(document)
    }

    /// Client for the configured GitLab project.
    ///
    /// # Errors
    /// Returns [`CiDiffError::Config`] when no project is set and
    /// [`CiDiffError::MissingToken`] when the token variable is empty.
    pub fn gitlab_client(&self, remote: &RemoteArgs) -> Result<GitlabClient> {
        let project = remote
            .project
            .as_deref()
            .or(self.config.gitlab.project.as_deref())
            .ok_or_else(|| {
                CiDiffError::Config(
                    "no GitLab project set: pass --project or set gitlab.project".to_string(),
                )
            })?;
        let token = token_from_env(&self.config.gitlab.token_env)?;
        GitlabClient::new(&self.config.gitlab.url, project, token)
    }

    /// Run `document` through `linter`, or through a GitLab client built from
    /// the configuration when none is given.
    ///
    /// # Errors
    /// See [`full_configuration`].
    pub fn merge_with_lint(
        &self,
        document: &Document,
        ignore_errors: bool,
        remote: &RemoteArgs,
        linter: Option<&dyn CiLinter>,
    ) -> Result<Document> {
        if let Some(linter) = linter {
            return full_configuration(linter, document, ignore_errors);
        }
        let client = self.gitlab_client(remote)?;
        full_configuration(&client, document, ignore_errors)
    }
}

/// Write to the output file, or to stdout unless quiet.
///
/// # Errors
/// Returns an error if the output file cannot be written.
pub fn write_output(output_path: Option<&Path>, content: &str, quiet: bool) -> Result<()> {
    if let Some(path) = output_path {
        fs::write(path, content)?;
    } else if !quiet {
        print!("{content}");
    }
    Ok(())
}

/// Text with exactly one trailing newline, or nothing when empty.
#[must_use]
pub fn terminated(mut text: String) -> String {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
