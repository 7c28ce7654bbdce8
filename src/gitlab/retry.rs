use std::time::Duration;

use crate::error::Result;

use super::Pipeline;

/// How often and how patiently a named remote call is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            delay: Duration::from_secs(2),
        }
    }
}

/// Run `op` until it succeeds or the attempts run out, logging each failure
/// under `name`. The last error is returned. Zero attempts count as one.
///
/// # Errors
/// Returns the error of the final attempt.
pub fn with_retry<T>(name: &str, policy: RetryPolicy, mut op: impl FnMut() -> Result<T>) -> Result<T> {
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= attempts => {
                tracing::error!(call = name, attempt, error = %e, "giving up");
                return Err(e);
            }
            Err(e) => {
                tracing::warn!(call = name, attempt, max = attempts, error = %e, "remote call failed, retrying");
                std::thread::sleep(policy.delay);
                attempt += 1;
            }
        }
    }
}

/// Source of pipeline state.
pub trait PipelineApi {
    /// # Errors
    /// Returns an error if the pipeline cannot be fetched.
    fn pipeline(&self, id: u64) -> Result<Pipeline>;
}

/// Reload `pipeline` in place, retrying transient failures.
///
/// # Errors
/// Returns the last error once every attempt failed.
pub fn refresh_pipeline(api: &dyn PipelineApi, pipeline: &mut Pipeline, policy: RetryPolicy) -> Result<()> {
    let name = format!("refresh pipeline #{}", pipeline.id);
    let id = pipeline.id;
    *pipeline = with_retry(&name, policy, || api.pipeline(id))?;
    Ok(())
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
