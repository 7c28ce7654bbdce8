use std::cell::RefCell;
use std::fs;

use tempfile::TempDir;

use super::*;
use crate::cli::RemoteArgs;
use crate::config::Config;

struct RecordingLinter {
    response: LintResult,
    received: RefCell<Vec<String>>,
}

impl RecordingLinter {
    fn new(response: LintResult) -> Self {
        Self {
            response,
            received: RefCell::new(Vec::new()),
        }
    }
}

impl CiLinter for RecordingLinter {
    fn lint(&self, content: &str) -> Result<LintResult> {
        self.received.borrow_mut().push(content.to_string());
        Ok(self.response.clone())
    }
}

fn project() -> (TempDir, CommandContext) {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(".gitlab-ci.yml"),
        "include: common.yml\nbuild:\n  script: make\n",
    )
    .unwrap();
    fs::write(temp_dir.path().join("common.yml"), "stages: [build]\n").unwrap();
    let mut ctx = CommandContext::new(Config::default(), temp_dir.path());
    ctx.quiet = true;
    (temp_dir, ctx)
}

fn lint_args() -> LintArgs {
    LintArgs {
        input: None,
        git_ref: None,
        remote: RemoteArgs::default(),
    }
}

#[test]
fn valid_configuration_exits_zero() {
    let (_dir, ctx) = project();
    let linter = RecordingLinter::new(LintResult {
        valid: true,
        ..LintResult::default()
    });

    assert_eq!(run_lint_impl(&lint_args(), &ctx, Some(&linter)).unwrap(), EXIT_SUCCESS);
}

#[test]
fn sends_the_resolved_configuration() {
    let (_dir, ctx) = project();
    let linter = RecordingLinter::new(LintResult {
        valid: true,
        ..LintResult::default()
    });

    run_lint_impl(&lint_args(), &ctx, Some(&linter)).unwrap();
    let received = linter.received.borrow();
    assert_eq!(received.len(), 1);
    assert!(!received[0].contains("include"));
    assert!(received[0].contains("stages:"));
    assert!(received[0].contains("build:"));
}

#[test]
fn invalid_configuration_exits_with_differences_code() {
    let (_dir, ctx) = project();
    let linter = RecordingLinter::new(LintResult {
        valid: false,
        errors: vec!["jobs:build config contains unknown keys: scrpt".to_string()],
        ..LintResult::default()
    });

    assert_eq!(
        run_lint_impl(&lint_args(), &ctx, Some(&linter)).unwrap(),
        EXIT_DIFFERENCES
    );
}

#[test]
fn missing_project_without_linter_fails() {
    let (_dir, ctx) = project();
    assert!(run_lint_impl(&lint_args(), &ctx, None).is_err());
}

#[test]
fn format_lists_errors_then_warnings() {
    let result = LintResult {
        valid: false,
        errors: vec!["bad key".to_string()],
        warnings: vec!["no rules".to_string()],
        merged_yaml: None,
    };

    assert_eq!(
        format_lint_result(".gitlab-ci.yml", &result),
        ".gitlab-ci.yml: invalid\n  error: bad key\n  warning: no rules\n"
    );
}

#[test]
fn format_valid_without_messages() {
    let result = LintResult {
        valid: true,
        ..LintResult::default()
    };
    assert_eq!(format_lint_result("ci.yml", &result), "ci.yml: valid\n");
}
