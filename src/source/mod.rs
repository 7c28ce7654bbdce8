//! Fragment Reader: loads one configuration fragment from a local file, a
//! git revision, or a remote URL, and parses it into a [`Document`].

mod filesystem;
mod git;
mod remote;
#[cfg(test)]
pub(crate) mod test_fixtures;

use std::fmt;
use std::path::{Path, PathBuf};

pub use filesystem::{FileSystem, RealFileSystem};
pub use git::{GitObjects, GixObjects};
pub use remote::{FetchPolicy, HttpClient, RemoteCache, ReqwestClient, fetch_remote, is_remote_url};

use crate::document::{Document, parse_document};
use crate::error::{CiDiffError, Result};

/// Where a fragment comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceId {
    /// A file on the local filesystem.
    Local(PathBuf),
    /// An `http://` or `https://` URL.
    Remote(String),
    /// A file as it exists at a git revision (`rev:path`).
    GitObject { rev: String, path: String },
}

impl SourceId {
    /// Classify a user-supplied identifier. When a git ref is active, local
    /// paths are read from that revision instead of the working tree.
    #[must_use]
    pub fn parse(raw: &str, git_ref: Option<&str>) -> Self {
        if is_remote_url(raw) {
            return Self::Remote(raw.to_string());
        }
        match git_ref {
            Some(rev) => Self::GitObject {
                rev: rev.to_string(),
                path: repo_relative(raw).to_string(),
            },
            None => Self::Local(PathBuf::from(raw)),
        }
    }

    /// Classify a path named by an `include` directive. A leading `/` means
    /// "from the project root", as GitLab reads it.
    #[must_use]
    pub fn from_include(raw: &str, git_ref: Option<&str>) -> Self {
        if is_remote_url(raw) {
            return Self::Remote(raw.to_string());
        }
        let path = repo_relative(raw);
        match git_ref {
            Some(rev) => Self::GitObject {
                rev: rev.to_string(),
                path: path.to_string(),
            },
            None => Self::Local(PathBuf::from(path)),
        }
    }
}

fn repo_relative(raw: &str) -> &str {
    let trimmed = raw.trim_start_matches('/');
    trimmed.strip_prefix("./").unwrap_or(trimmed)
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => f.write_str(url),
            Self::GitObject { rev, path } => write!(f, "{rev}:{path}"),
        }
    }
}

/// A parsed document plus the source it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub source: SourceId,
    pub document: Document,
}

/// Reads and parses fragments from any supported source.
pub struct FragmentReader<F: FileSystem = RealFileSystem> {
    fs: F,
    http: Box<dyn HttpClient>,
    git: Option<Box<dyn GitObjects>>,
    cache: Option<RemoteCache>,
    fetch_policy: FetchPolicy,
    root: PathBuf,
}

impl Default for FragmentReader<RealFileSystem> {
    fn default() -> Self {
        Self::new()
    }
}

impl FragmentReader<RealFileSystem> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_fs(RealFileSystem)
    }
}

impl<F: FileSystem> FragmentReader<F> {
    #[must_use]
    pub fn with_fs(fs: F) -> Self {
        Self {
            fs,
            http: Box::new(ReqwestClient),
            git: None,
            cache: None,
            fetch_policy: FetchPolicy::Normal,
            root: PathBuf::from("."),
        }
    }

    #[must_use]
    pub fn with_http(mut self, http: impl HttpClient + 'static) -> Self {
        self.http = Box::new(http);
        self
    }

    #[must_use]
    pub fn with_git(mut self, git: impl GitObjects + 'static) -> Self {
        self.git = Some(Box::new(git));
        self
    }

    #[must_use]
    pub fn with_cache(mut self, cache: Option<RemoteCache>, policy: FetchPolicy) -> Self {
        self.cache = cache;
        self.fetch_policy = policy;
        self
    }

    /// Directory relative local paths are resolved against.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn local_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Stable key identifying a source, used to detect include cycles.
    /// Local paths are canonicalized so that `a/../b.yml` and `b.yml` match.
    #[must_use]
    pub fn identity(&self, id: &SourceId) -> String {
        match id {
            SourceId::Local(path) => {
                let full = self.local_path(path);
                self.fs
                    .canonicalize(&full)
                    .unwrap_or(full)
                    .to_string_lossy()
                    .to_string()
            }
            other => other.to_string(),
        }
    }

    /// Read the raw text of a source.
    ///
    /// # Errors
    /// Returns [`CiDiffError::SourceUnavailable`] if the source cannot be read.
    pub fn read_raw(&self, id: &SourceId) -> Result<String> {
        tracing::debug!(source = %id, "reading fragment");
        match id {
            SourceId::Local(path) => self
                .fs
                .read_to_string(&self.local_path(path))
                .map_err(|e| CiDiffError::source_unavailable(id, e)),
            SourceId::Remote(url) => {
                fetch_remote(url, self.http.as_ref(), self.cache.as_ref(), self.fetch_policy)
            }
            SourceId::GitObject { rev, path } => self
                .git
                .as_ref()
                .ok_or_else(|| CiDiffError::source_unavailable(id, "no git repository available"))?
                .read_blob(rev, path),
        }
    }

    /// Read and parse one fragment.
    ///
    /// # Errors
    /// Returns [`CiDiffError::SourceUnavailable`] if the source cannot be read and
    /// [`CiDiffError::Parse`] if its content is not a well-formed YAML mapping.
    pub fn read(&self, id: &SourceId) -> Result<Fragment> {
        let content = self.read_raw(id)?;
        let document = parse_document(&content, &id.to_string())?;
        Ok(Fragment {
            source: id.clone(),
            document,
        })
    }
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
