use std::path::{Path, PathBuf};

use crate::error::{CiDiffError, Result};
use crate::source::{FileSystem, RealFileSystem};

use super::Config;

/// Trait for loading configuration from various sources.
pub trait ConfigLoader {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    /// Returns an error if a config file exists but cannot be read or parsed.
    fn load(&self) -> Result<Config>;

    /// Load configuration from a specific path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    fn load_from_path(&self, path: &Path) -> Result<Config>;
}

pub const LOCAL_CONFIG_NAME: &str = ".ci-config-diff.toml";
const USER_CONFIG_NAME: &str = "config.toml";

/// Loads configuration from the filesystem.
///
/// Search order:
/// 1. `.ci-config-diff.toml` in the current directory
/// 2. `config.toml` in the platform user config directory
///    (`~/.config/ci-config-diff` on Linux)
/// 3. `Config::default()`
#[derive(Debug)]
pub struct FileConfigLoader<F: FileSystem = RealFileSystem> {
    fs: F,
    current_dir: Option<PathBuf>,
    user_config_dir: Option<PathBuf>,
}

impl Default for FileConfigLoader<RealFileSystem> {
    fn default() -> Self {
        Self::new()
    }
}

impl FileConfigLoader<RealFileSystem> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_fs(RealFileSystem)
    }
}

impl<F: FileSystem> FileConfigLoader<F> {
    #[must_use]
    pub fn with_fs(fs: F) -> Self {
        Self {
            fs,
            current_dir: std::env::current_dir().ok(),
            user_config_dir: directories::ProjectDirs::from("", "", "ci-config-diff")
                .map(|dirs| dirs.config_dir().to_path_buf()),
        }
    }

    /// Override the directories searched by [`ConfigLoader::load`].
    #[must_use]
    pub fn with_dirs(mut self, current_dir: Option<PathBuf>, user_config_dir: Option<PathBuf>) -> Self {
        self.current_dir = current_dir;
        self.user_config_dir = user_config_dir;
        self
    }

    fn candidates(&self) -> impl Iterator<Item = PathBuf> + '_ {
        let local = self.current_dir.as_ref().map(|dir| dir.join(LOCAL_CONFIG_NAME));
        let user = self.user_config_dir.as_ref().map(|dir| dir.join(USER_CONFIG_NAME));
        local.into_iter().chain(user)
    }

    fn parse_config(content: &str) -> Result<Config> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}

impl<F: FileSystem> ConfigLoader for FileConfigLoader<F> {
    fn load(&self) -> Result<Config> {
        for path in self.candidates() {
            if self.fs.exists(&path) {
                return self.load_from_path(&path);
            }
        }
        tracing::debug!("no configuration file found, using defaults");
        Ok(Config::default())
    }

    fn load_from_path(&self, path: &Path) -> Result<Config> {
        let content = self.fs.read_to_string(path).map_err(|e| {
            CiDiffError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "loading configuration");
        Self::parse_config(&content)
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
