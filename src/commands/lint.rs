use std::fmt::Write;

use crate::cli::{Cli, LintArgs};
use crate::document::YamlEmitter;
use crate::error::Result;
use crate::gitlab::{CiLinter, LintResult};
use crate::{EXIT_DIFFERENCES, EXIT_SUCCESS};

use super::context::{CommandContext, LoadRequest, report_error, write_output};

#[must_use]
pub fn run_lint(args: &LintArgs, cli: &Cli) -> i32 {
    let result = CommandContext::from_cli(cli).and_then(|ctx| run_lint_impl(args, &ctx, None));
    match result {
        Ok(exit_code) => exit_code,
        Err(e) => report_error(&e),
    }
}

/// Resolves includes locally and asks the lint API whether the result is valid.
/// Exits with 1 when it is not.
///
/// # Errors
/// Returns an error if the configuration cannot be resolved or the API is unreachable.
pub fn run_lint_impl(args: &LintArgs, ctx: &CommandContext, linter: Option<&dyn CiLinter>) -> Result<i32> {
    let input = ctx.input(args.input.as_deref());
    let request = LoadRequest {
        input,
        git_ref: args.git_ref.as_deref(),
        ..LoadRequest::default()
    };
    let document = ctx.resolve(&request, &args.remote)?;
    let content = YamlEmitter::default().mapping_to_string(&document);

    let result = match linter {
        Some(linter) => linter.lint(&content)?,
        None => ctx.gitlab_client(&args.remote)?.lint(&content)?,
    };

    write_output(None, &format_lint_result(input, &result), ctx.quiet)?;
    Ok(if result.valid { EXIT_SUCCESS } else { EXIT_DIFFERENCES })
}

#[must_use]
pub fn format_lint_result(input: &str, result: &LintResult) -> String {
    let mut output = String::new();
    let verdict = if result.valid { "valid" } else { "invalid" };
    writeln!(output, "{input}: {verdict}").ok();
    for error in &result.errors {
        writeln!(output, "  error: {error}").ok();
    }
    for warning in &result.warnings {
        writeln!(output, "  warning: {warning}").ok();
    }
    output
}

#[cfg(test)]
#[path = "lint_tests.rs"]
mod tests;
