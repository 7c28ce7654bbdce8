use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{CiDiffError, Result};

use super::{CiLinter, LintResult, PipelineApi};

const REQUEST_TIMEOUT_SECS: u64 = 30;
const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// A commit as returned by the repository API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Commit {
    pub id: String,
    #[serde(default)]
    pub short_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A pipeline as returned by the pipelines API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Pipeline {
    pub id: u64,
    pub status: String,
    #[serde(rename = "ref", default)]
    pub git_ref: Option<String>,
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
}

#[derive(Serialize)]
struct LintRequest<'a> {
    content: &'a str,
    dry_run: bool,
    include_jobs: bool,
}

/// Blocking client for one GitLab project.
#[derive(Debug)]
pub struct GitlabClient {
    base_url: String,
    project: String,
    project_root: Url,
    token: String,
    http: reqwest::blocking::Client,
}

impl GitlabClient {
    /// # Errors
    /// Returns an error if `base_url` is not a valid base URL or the HTTP
    /// client cannot be built.
    pub fn new(base_url: &str, project: &str, token: impl Into<String>) -> Result<Self> {
        let project_root = project_root(base_url, project)?;
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| CiDiffError::Api(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            project: project.to_string(),
            project_root,
            token: token.into(),
            http,
        })
    }

    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    /// `{base}/api/v4/projects/{project}/{path}` with the project path escaped.
    #[must_use]
    pub fn project_url(&self, path: &str) -> String {
        let mut url = self.project_root.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.extend(path.split('/').filter(|segment| !segment.is_empty()));
        }
        url.into()
    }

    /// # Errors
    /// Returns [`CiDiffError::Api`] on transport errors or non-2xx responses.
    pub fn commit(&self, sha: &str) -> Result<Commit> {
        let url = self.project_url(&format!("repository/commits/{sha}"));
        tracing::debug!(%url, "fetching commit");
        self.send(self.http.get(&url))
    }

    /// # Errors
    /// Returns [`CiDiffError::Api`] on transport errors or non-2xx responses.
    pub fn pipeline(&self, id: u64) -> Result<Pipeline> {
        let url = self.project_url(&format!("pipelines/{id}"));
        tracing::debug!(%url, "fetching pipeline");
        self.send(self.http.get(&url))
    }

    fn send<T: DeserializeOwned>(&self, request: reqwest::blocking::RequestBuilder) -> Result<T> {
        let response = request
            .header(TOKEN_HEADER, &self.token)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    CiDiffError::Api(format!("Request timeout talking to {}", self.base_url))
                } else if e.is_connect() {
                    CiDiffError::Api(format!("Failed to connect to {}", self.base_url))
                } else {
                    CiDiffError::Api(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| CiDiffError::Api(format!("Failed to read response: {e}")))?;
        if !status.is_success() {
            return Err(CiDiffError::Api(format!("HTTP {status}: {}", body.trim())));
        }

        serde_json::from_str(&body)
            .map_err(|e| CiDiffError::Api(format!("Unexpected response body: {e}")))
    }
}

impl CiLinter for GitlabClient {
    fn lint(&self, content: &str) -> Result<LintResult> {
        let url = self.project_url("ci/lint");
        let body = serde_json::to_string(&LintRequest {
            content,
            dry_run: true,
            include_jobs: true,
        })?;
        tracing::info!(project = %self.project, bytes = content.len(), "linting configuration");

        self.send(
            self.http
                .post(&url)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body),
        )
    }
}

impl PipelineApi for GitlabClient {
    fn pipeline(&self, id: u64) -> Result<Pipeline> {
        Self::pipeline(self, id)
    }
}

/// Escape a `group/project` path for use as a single URL segment.
fn project_root(base_url: &str, project: &str) -> Result<Url> {
    let invalid = || CiDiffError::Config(format!("Invalid GitLab URL: {base_url}"));
    let mut url = Url::parse(base_url).map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|()| invalid())?
        .pop_if_empty()
        .extend(["api", "v4", "projects"])
        .push(project);
    Ok(url)
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
