use std::cell::Cell;
use std::time::Duration;

use super::*;
use crate::error::CiDiffError;

const FAST: RetryPolicy = RetryPolicy {
    attempts: 3,
    delay: Duration::ZERO,
};

#[test]
fn returns_first_success() {
    let calls = Cell::new(0);
    let value = with_retry("op", FAST, || {
        calls.set(calls.get() + 1);
        Ok(7)
    })
    .unwrap();
    assert_eq!(value, 7);
    assert_eq!(calls.get(), 1);
}

#[test]
fn retries_until_success() {
    let calls = Cell::new(0);
    let value = with_retry("op", FAST, || {
        calls.set(calls.get() + 1);
        if calls.get() < 3 {
            Err(CiDiffError::Api("flaky".to_string()))
        } else {
            Ok("done")
        }
    })
    .unwrap();
    assert_eq!(value, "done");
    assert_eq!(calls.get(), 3);
}

#[test]
fn gives_up_with_last_error() {
    let calls = Cell::new(0);
    let err = with_retry::<()>("op", FAST, || {
        calls.set(calls.get() + 1);
        Err(CiDiffError::Api(format!("attempt {}", calls.get())))
    })
    .unwrap_err();
    assert_eq!(calls.get(), 3);
    assert!(err.to_string().contains("attempt 3"));
}

#[test]
fn zero_attempts_still_runs_once() {
    let calls = Cell::new(0);
    let policy = RetryPolicy {
        attempts: 0,
        delay: Duration::ZERO,
    };
    let _ = with_retry::<()>("op", policy, || {
        calls.set(calls.get() + 1);
        Err(CiDiffError::Api("down".to_string()))
    });
    assert_eq!(calls.get(), 1);
}

struct FlakyPipelines {
    failures: Cell<u32>,
}

impl PipelineApi for FlakyPipelines {
    fn pipeline(&self, id: u64) -> Result<Pipeline> {
        if self.failures.get() > 0 {
            self.failures.set(self.failures.get() - 1);
            return Err(CiDiffError::Api("HTTP 502 Bad Gateway".to_string()));
        }
        Ok(Pipeline {
            id,
            status: "success".to_string(),
            git_ref: Some("main".to_string()),
            sha: None,
            web_url: None,
        })
    }
}

fn pending(id: u64) -> Pipeline {
    Pipeline {
        id,
        status: "running".to_string(),
        git_ref: None,
        sha: None,
        web_url: None,
    }
}

#[test]
fn refresh_pipeline_updates_in_place() {
    let api = FlakyPipelines {
        failures: Cell::new(2),
    };
    let mut pipeline = pending(9);
    refresh_pipeline(&api, &mut pipeline, FAST).unwrap();
    assert_eq!(pipeline.status, "success");
    assert_eq!(pipeline.id, 9);
}

#[test]
fn refresh_pipeline_keeps_state_on_failure() {
    let api = FlakyPipelines {
        failures: Cell::new(10),
    };
    let mut pipeline = pending(9);
    assert!(refresh_pipeline(&api, &mut pipeline, FAST).is_err());
    assert_eq!(pipeline.status, "running");
}

#[test]
fn default_policy() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.attempts, 5);
    assert_eq!(policy.delay, Duration::from_secs(2));
}
