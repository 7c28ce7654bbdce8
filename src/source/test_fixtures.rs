//! In-memory sources shared by reader and resolver tests.

use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{CiDiffError, Result};

use super::{FileSystem, GitObjects, HttpClient};

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Filesystem backed by a map of normalized paths.
#[derive(Debug, Default, Clone)]
pub struct MemoryFileSystem {
    files: HashMap<PathBuf, String>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files
            .insert(normalize(Path::new(path)), content.to_string());
        self
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(&normalize(path))
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No such file or directory"))
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(&normalize(path))
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        let normalized = normalize(path);
        if self.files.contains_key(&normalized) {
            Ok(normalized)
        } else {
            Err(io::Error::new(io::ErrorKind::NotFound, "No such file or directory"))
        }
    }
}

/// Git revisions backed by a map of `rev:path` specs.
#[derive(Debug, Default, Clone)]
pub struct MemoryGit {
    blobs: HashMap<String, String>,
}

impl MemoryGit {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_blob(mut self, rev: &str, path: &str, content: &str) -> Self {
        self.blobs
            .insert(format!("{rev}:{path}"), content.to_string());
        self
    }
}

impl GitObjects for MemoryGit {
    fn read_blob(&self, rev: &str, path: &str) -> Result<String> {
        let spec = format!("{rev}:{path}");
        self.blobs
            .get(&spec)
            .cloned()
            .ok_or_else(|| CiDiffError::source_unavailable(&spec, "path does not exist"))
    }
}

/// HTTP client serving canned bodies; unknown URLs answer 404.
#[derive(Debug, Default, Clone)]
pub struct StaticHttp {
    bodies: HashMap<String, String>,
}

impl StaticHttp {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_body(mut self, url: &str, body: &str) -> Self {
        self.bodies.insert(url.to_string(), body.to_string());
        self
    }
}

impl HttpClient for StaticHttp {
    fn get(&self, url: &str) -> Result<String> {
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| CiDiffError::source_unavailable(url, "HTTP 404 Not Found"))
    }
}
