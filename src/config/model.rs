use serde::{Deserialize, Serialize};

use crate::error::{CiDiffError, Result};
use crate::output::DEFAULT_MAX_DETAILED_JOBS;

pub const DEFAULT_INPUT_FILE: &str = ".gitlab-ci.yml";
pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";
pub const DEFAULT_TOKEN_ENV: &str = "GITLAB_TOKEN";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Tool settings read from `.ci-config-diff.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Entry configuration file, relative to the project root.
    #[serde(default = "default_input_file")]
    pub input_file: String,

    #[serde(default)]
    pub gitlab: GitlabConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub remote: RemoteConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_file: default_input_file(),
            gitlab: GitlabConfig::default(),
            render: RenderConfig::default(),
            remote: RemoteConfig::default(),
        }
    }
}

impl Config {
    /// Reject values no command could work with.
    ///
    /// # Errors
    /// Returns [`CiDiffError::Config`] describing the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.input_file.trim().is_empty() {
            return Err(CiDiffError::Config("input_file must not be empty".to_string()));
        }
        if !crate::source::is_remote_url(&self.gitlab.url) {
            return Err(CiDiffError::Config(format!(
                "gitlab.url must start with http:// or https://, got '{}'",
                self.gitlab.url
            )));
        }
        if self.gitlab.token_env.trim().is_empty() {
            return Err(CiDiffError::Config("gitlab.token_env must not be empty".to_string()));
        }
        Ok(())
    }
}

/// GitLab instance used for linting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GitlabConfig {
    #[serde(default = "default_gitlab_url")]
    pub url: String,

    /// Project path (`group/project`) or numeric id.
    #[serde(default)]
    pub project: Option<String>,

    /// Environment variable holding the API token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for GitlabConfig {
    fn default() -> Self {
        Self {
            url: default_gitlab_url(),
            project: None,
            token_env: default_token_env(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    #[serde(default = "default_max_detailed_jobs")]
    pub max_detailed_jobs: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_detailed_jobs: default_max_detailed_jobs(),
        }
    }
}

/// Caching of `include:remote` downloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RemoteConfig {
    #[serde(default = "default_true")]
    pub cache: bool,

    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            cache: true,
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

fn default_input_file() -> String {
    DEFAULT_INPUT_FILE.to_string()
}

fn default_gitlab_url() -> String {
    DEFAULT_GITLAB_URL.to_string()
}

fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

const fn default_max_detailed_jobs() -> usize {
    DEFAULT_MAX_DETAILED_JOBS
}

const fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
