use crate::cli::{Cli, ResolveArgs};
use crate::document::Document;
use crate::error::{CiDiffError, Result};
use crate::gitlab::CiLinter;
use crate::normalize::prepare_for_diff;
use crate::output::format_configuration;
use crate::EXIT_SUCCESS;

use super::context::{CommandContext, LoadRequest, report_error, terminated, write_output};

#[must_use]
pub fn run_resolve(args: &ResolveArgs, cli: &Cli) -> i32 {
    let result = CommandContext::from_cli(cli).and_then(|ctx| run_resolve_impl(args, &ctx, None));
    match result {
        Ok(exit_code) => exit_code,
        Err(e) => report_error(&e),
    }
}

/// Resolves a configuration and prints it job by job.
///
/// # Errors
/// Returns an error if resolution, linting or writing the output fails.
pub fn run_resolve_impl(
    args: &ResolveArgs,
    ctx: &CommandContext,
    linter: Option<&dyn CiLinter>,
) -> Result<i32> {
    let document = resolve_configuration(args, ctx, linter)?;
    let output = terminated(format_configuration(&document, args.sort_jobs));
    write_output(args.output.as_deref(), &output, ctx.quiet)?;
    Ok(EXIT_SUCCESS)
}

/// Resolve, optionally lint, then narrow to jobs unless `--no-clean`.
///
/// # Errors
/// See [`run_resolve_impl`].
pub fn resolve_configuration(
    args: &ResolveArgs,
    ctx: &CommandContext,
    linter: Option<&dyn CiLinter>,
) -> Result<Document> {
    let request = LoadRequest {
        input: ctx.input(args.input.as_deref()),
        git_ref: args.git_ref.as_deref(),
        variables: &args.variables,
        compare_to: args.compare_to.as_deref(),
        provenance: args.with_provenance,
    };
    let mut document = ctx.resolve(&request, &args.remote)?;

    if args.lint {
        document = ctx.merge_with_lint(&document, args.ignore_errors, &args.remote, linter)?;
    }

    if !args.no_clean {
        return prepare_for_diff(document, args.job.as_deref(), true);
    }

    match args.job.as_deref() {
        None => Ok(document),
        Some(job) => {
            let body = document
                .shift_remove(job)
                .ok_or_else(|| CiDiffError::JobNotFound(job.to_string()))?;
            Ok(Document::from([(job.to_string(), body)]))
        }
    }
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
