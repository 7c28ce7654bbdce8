use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use sha2::{Digest, Sha256};

use crate::error::{CiDiffError, Result};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP client abstraction for dependency injection.
pub trait HttpClient {
    /// Perform a GET request and return the response body.
    ///
    /// # Errors
    /// Returns an error on network failure or a non-2xx status.
    fn get(&self, url: &str) -> Result<String>;
}

/// Production HTTP client using reqwest.
///
/// This implementation cannot be unit tested without a real HTTP server,
/// so it is excluded from coverage measurement.
#[derive(Debug, Default)]
pub struct ReqwestClient;

#[cfg(not(tarpaulin_include))]
impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<String> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                CiDiffError::source_unavailable(url, format!("failed to create HTTP client: {e}"))
            })?;

        let response = client.get(url).send().map_err(|e| {
            let reason = if e.is_timeout() {
                "request timed out".to_string()
            } else if e.is_connect() {
                "failed to connect".to_string()
            } else {
                e.to_string()
            };
            CiDiffError::source_unavailable(url, reason)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CiDiffError::source_unavailable(url, format!("HTTP {status}")));
        }

        response
            .text()
            .map_err(|e| CiDiffError::source_unavailable(url, format!("failed to read body: {e}")))
    }
}

/// Check if a string is a remote URL (http:// or https://).
#[must_use]
pub fn is_remote_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Whether cached remote fragments may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPolicy {
    /// Use a cached copy within its TTL, otherwise fetch and cache.
    #[default]
    Normal,
    /// Always fetch; still refresh the cache.
    Fresh,
}

/// On-disk cache of remote fragments keyed by the SHA-256 of their URL.
#[derive(Debug, Clone)]
pub struct RemoteCache {
    dir: PathBuf,
    ttl: Duration,
}

impl RemoteCache {
    #[must_use]
    pub const fn new(dir: PathBuf, ttl: Duration) -> Self {
        Self { dir, ttl }
    }

    /// Cache under the platform cache directory.
    #[must_use]
    pub fn default_location(ttl: Duration) -> Option<Self> {
        directories::ProjectDirs::from("", "", "ci-config-diff")
            .map(|dirs| Self::new(dirs.cache_dir().join("includes"), ttl))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_path(&self, url: &str) -> PathBuf {
        self.dir.join(format!("{}.yml", hash_url(url)))
    }

    fn is_valid(&self, cache_path: &Path) -> bool {
        let Ok(metadata) = fs::metadata(cache_path) else {
            return false;
        };

        let Ok(modified) = metadata.modified() else {
            return false;
        };

        let Ok(elapsed) = SystemTime::now().duration_since(modified) else {
            return false;
        };

        elapsed < self.ttl
    }

    /// Try to read a fragment from cache.
    #[must_use]
    pub fn read(&self, url: &str) -> Option<String> {
        let cache_path = self.file_path(url);
        if self.is_valid(&cache_path) {
            fs::read_to_string(&cache_path).ok()
        } else {
            None
        }
    }

    /// Write a fragment to cache.
    pub fn write(&self, url: &str, content: &str) -> Option<()> {
        fs::create_dir_all(&self.dir).ok()?;
        let mut file = fs::File::create(self.file_path(url)).ok()?;
        file.write_all(content.as_bytes()).ok()?;
        Some(())
    }

    /// Remove every cached fragment. Returns the number of files deleted.
    #[must_use]
    pub fn clear(&self) -> usize {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return 0;
        };

        let mut count = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yml") && fs::remove_file(&path).is_ok()
            {
                count += 1;
            }
        }
        count
    }
}

/// Compute SHA-256 hash of URL for cache filename.
fn hash_url(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Fetch a remote fragment through the optional cache.
///
/// # Errors
/// Returns [`CiDiffError::SourceUnavailable`] when the URL is not http(s) or
/// the request fails.
pub fn fetch_remote(
    url: &str,
    client: &dyn HttpClient,
    cache: Option<&RemoteCache>,
    policy: FetchPolicy,
) -> Result<String> {
    if !is_remote_url(url) {
        return Err(CiDiffError::source_unavailable(
            url,
            "remote includes must start with http:// or https://",
        ));
    }

    if policy == FetchPolicy::Normal
        && let Some(cached) = cache.and_then(|c| c.read(url))
    {
        tracing::debug!(url, "using cached remote include");
        return Ok(cached);
    }

    tracing::debug!(url, "fetching remote include");
    let content = client.get(url)?;

    // Cache write errors are ignored.
    if let Some(cache) = cache {
        let _ = cache.write(url, &content);
    }

    Ok(content)
}

#[cfg(test)]
#[path = "remote_tests.rs"]
mod tests;
