use std::path::{Path, PathBuf};

use crate::error::{CiDiffError, Result};

/// Reads file contents as they exist at a git revision.
pub trait GitObjects {
    /// Read `path` (relative to the repository root) at `rev`.
    ///
    /// # Errors
    /// Returns [`CiDiffError::SourceUnavailable`] if the revision or path cannot be resolved
    /// or the object is not a UTF-8 blob.
    fn read_blob(&self, rev: &str, path: &str) -> Result<String>;
}

/// Git object reader using gix.
pub struct GixObjects {
    repo_path: PathBuf,
    workdir: Option<PathBuf>,
}

impl GixObjects {
    /// Create a reader for the repository containing the given path.
    ///
    /// # Errors
    /// Returns an error if no git repository is found.
    pub fn discover(path: &Path) -> Result<Self> {
        let repo = gix::discover(path)
            .map_err(|e| CiDiffError::Git(format!("Failed to discover git repository: {e}")))?;
        Ok(Self {
            repo_path: repo.path().to_path_buf(),
            workdir: repo.workdir().map(Path::to_path_buf),
        })
    }

    /// Working directory of the repository, if it is not bare.
    #[must_use]
    pub fn workdir(&self) -> Option<&Path> {
        self.workdir.as_deref()
    }

    fn open_repo(&self) -> Result<gix::Repository> {
        gix::open(&self.repo_path)
            .map_err(|e| CiDiffError::Git(format!("Failed to open git repository: {e}")))
    }
}

impl GitObjects for GixObjects {
    fn read_blob(&self, rev: &str, path: &str) -> Result<String> {
        let spec = format!("{rev}:{path}");
        let repo = self.open_repo()?;

        let object = repo
            .rev_parse_single(spec.as_str())
            .map_err(|e| CiDiffError::source_unavailable(&spec, e))?
            .object()
            .map_err(|e| CiDiffError::source_unavailable(&spec, e))?;

        if object.kind != gix::object::Kind::Blob {
            return Err(CiDiffError::source_unavailable(
                &spec,
                format!("expected a file, found a {}", object.kind),
            ));
        }

        tracing::debug!(spec = %spec, bytes = object.data.len(), "read git blob");
        String::from_utf8(object.data.clone())
            .map_err(|e| CiDiffError::source_unavailable(&spec, e))
    }
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
