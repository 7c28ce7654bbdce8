use thiserror::Error;

#[derive(Error, Debug)]
pub enum CiDiffError {
    #[error("Source unavailable: {source_id}: {reason}")]
    SourceUnavailable { source_id: String, reason: String },

    #[error("Failed to parse {source_id}: {message}")]
    Parse { source_id: String, message: String },

    #[error("Job {0} not found in the configuration")]
    JobNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Circular include detected: {}", chain.join(" -> "))]
    CyclicInclude { chain: Vec<String> },

    #[error("Include nesting too deep ({depth} > {max}): {}", chain.join(" -> "))]
    IncludeTooDeep {
        depth: usize,
        max: usize,
        chain: Vec<String>,
    },

    #[error("Unsupported include in {source_id}: {detail}")]
    UnsupportedInclude { source_id: String, detail: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Git error: {0}")]
    Git(String),

    #[error("GitLab API error: {0}")]
    Api(String),

    #[error("GitLab token not found: set the {0} environment variable")]
    MissingToken(String),
}

impl CiDiffError {
    /// Short, stable name of the error kind, used as the headline of CLI error output.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::SourceUnavailable { .. } => "SourceUnavailable",
            Self::Parse { .. } => "ParseError",
            Self::JobNotFound(_) => "JobNotFound",
            Self::InvalidConfiguration(_) => "InvalidConfiguration",
            Self::CyclicInclude { .. } => "CyclicInclude",
            Self::IncludeTooDeep { .. } => "IncludeTooDeep",
            Self::UnsupportedInclude { .. } => "UnsupportedInclude",
            Self::Config(_) | Self::ConfigParse(_) => "Config",
            Self::Io(_) => "IO",
            Self::Json(_) => "JSON",
            Self::Git(_) => "Git",
            Self::Api(_) => "API",
            Self::MissingToken(_) => "MissingToken",
        }
    }

    pub fn source_unavailable(source_id: impl ToString, reason: impl ToString) -> Self {
        Self::SourceUnavailable {
            source_id: source_id.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn parse(source_id: impl ToString, message: impl ToString) -> Self {
        Self::Parse {
            source_id: source_id.to_string(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CiDiffError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
