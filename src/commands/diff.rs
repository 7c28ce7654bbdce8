use crate::cli::{Cli, DiffArgs};
use crate::diff::CiDiff;
use crate::document::Document;
use crate::error::Result;
use crate::gitlab::CiLinter;
use crate::normalize::prepare_for_diff;
use crate::output::{OutputFormat, RenderOptions, print_warning};
use crate::{EXIT_DIFFERENCES, EXIT_SUCCESS};

use super::context::{CommandContext, LoadRequest, report_error, terminated, write_output};

const NO_DIFFERENCES: &str = "No differences found.";

/// One side of a comparison: a file on disk or the entry file at a revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side<'a> {
    File(&'a str),
    Revision(&'a str),
}

impl<'a> Side<'a> {
    fn of(file: Option<&'a str>, git_ref: Option<&'a str>) -> Option<Self> {
        file.map(Self::File).or_else(|| git_ref.map(Self::Revision))
    }

    /// Files are read as given; revisions read `input` at that ref.
    fn request(side: Option<Self>, input: &'a str) -> LoadRequest<'a> {
        match side {
            Some(Self::File(path)) => LoadRequest {
                input: path,
                ..LoadRequest::default()
            },
            Some(Self::Revision(rev)) => LoadRequest {
                input,
                git_ref: Some(rev),
                ..LoadRequest::default()
            },
            None => LoadRequest {
                input,
                ..LoadRequest::default()
            },
        }
    }
}

#[must_use]
pub fn run_diff(args: &DiffArgs, cli: &Cli) -> i32 {
    let result = CommandContext::from_cli(cli).and_then(|ctx| run_diff_impl(args, &ctx, None));
    match result {
        Ok(exit_code) => exit_code,
        Err(e) => report_error(&e),
    }
}

/// Compares two configurations and renders the job diff.
///
/// # Errors
/// Returns an error if either side cannot be loaded or the output cannot be written.
pub fn run_diff_impl(args: &DiffArgs, ctx: &CommandContext, linter: Option<&dyn CiLinter>) -> Result<i32> {
    let diff = compute_diff(args, ctx, linter)?;

    if args.job_url.is_some() && args.format == OutputFormat::Text && !ctx.quiet {
        print_warning("--job-url has no effect on text output", Some("use --format markdown"));
    }

    let options = RenderOptions {
        max_detailed_jobs: args
            .max_detailed
            .unwrap_or(ctx.config.render.max_detailed_jobs),
        job_url: args.job_url.clone(),
        summary_only: args.summary_only,
    };

    let mut rendered = args.format.formatter(ctx.color).format(&diff, &options)?;
    if diff.is_empty() && args.format == OutputFormat::Text {
        rendered = NO_DIFFERENCES.to_string();
    }
    write_output(args.output.as_deref(), &terminated(rendered), ctx.quiet)?;

    if args.exit_code && !diff.is_empty() {
        Ok(EXIT_DIFFERENCES)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Load both sides and diff them.
///
/// # Errors
/// See [`run_diff_impl`].
pub fn compute_diff(args: &DiffArgs, ctx: &CommandContext, linter: Option<&dyn CiLinter>) -> Result<CiDiff> {
    let input = ctx.input(args.input.as_deref());
    let before_side = Side::of(args.before.as_deref(), args.before_ref.as_deref());
    let after_side = Side::of(args.after.as_deref(), args.after_ref.as_deref());

    let before = load_side(args, ctx, &Side::request(before_side, input), linter)?;
    let after = load_side(args, ctx, &Side::request(after_side, input), linter)?;
    Ok(CiDiff::compute(&before, &after))
}

fn load_side(
    args: &DiffArgs,
    ctx: &CommandContext,
    request: &LoadRequest<'_>,
    linter: Option<&dyn CiLinter>,
) -> Result<Document> {
    let remote = &args.remote;
    tracing::info!(input = request.input, git_ref = ?request.git_ref, "loading configuration");
    let mut document = ctx.resolve(request, remote)?;
    if args.lint {
        document = ctx.merge_with_lint(&document, args.ignore_errors, remote, linter)?;
    }
    prepare_for_diff(document, args.job.as_deref(), true)
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;
