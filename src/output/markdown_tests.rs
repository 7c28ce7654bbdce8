use crate::diff::CiDiff;
use crate::document::{Document, parse_document};
use crate::output::{DiffFormatter, RenderOptions};

use super::MarkdownFormatter;

fn doc(yaml: &str) -> Document {
    parse_document(yaml, "test.yml").unwrap()
}

fn sample_diff() -> CiDiff {
    CiDiff::compute(
        &doc("job1:\n  script: [a, b, c]\njob2:\n  script: w\njob4:\n  script: y\n"),
        &doc("job1:\n  script: [a, z, c]\njob2_renamed:\n  script: w\njob5:\n  script: q\n"),
    )
}

fn many_added(count: usize) -> CiDiff {
    let yaml: String = (0..count)
        .map(|i| format!("job{i}:\n  script: run {i}\n"))
        .collect();
    CiDiff::compute(&Document::new(), &doc(&yaml))
}

#[test]
fn renders_full_report() {
    let output = MarkdownFormatter
        .format(&sample_diff(), &RenderOptions::default())
        .unwrap();

    let expected = [
        "### Modified Jobs",
        "<details>",
        "<summary><b>job1</b></summary>",
        "",
        "```diff",
        "  job1:",
        "    script:",
        "    - a",
        "-   - b",
        "+   - z",
        "    - c",
        "```",
        "",
        "</details>",
        "",
        "### Added Jobs",
        "<details>",
        "<summary><b>job5</b></summary>",
        "",
        "```yaml",
        "job5:",
        "  script: q",
        "```",
        "",
        "</details>",
        "",
        "### Removed Jobs",
        "- **job4**",
        "",
        "### Renamed Jobs",
        "- job2 -> **job2_renamed**",
        "",
        "### Changes Summary",
        "| Removed | Modified | Added | Renamed |",
        "| ------- | -------- | ----- | ------- |",
        "| 1 | 1 | 1 | 1 |",
    ]
    .join("\n");
    assert_eq!(output, expected);
}

#[test]
fn job_url_adds_note() {
    let options = RenderOptions {
        job_url: Some("https://ci.example.com/jobs/42".to_string()),
        ..RenderOptions::default()
    };
    let output = MarkdownFormatter.format(&sample_diff(), &options).unwrap();
    assert!(output.ends_with(
        "| 1 | 1 | 1 | 1 |\n\n:information_source: *Diff available in the [job log](https://ci.example.com/jobs/42).*"
    ));
}

#[test]
fn summary_only_warns_about_size() {
    let options = RenderOptions {
        summary_only: true,
        ..RenderOptions::default()
    };
    let output = MarkdownFormatter.format(&sample_diff(), &options).unwrap();
    assert_eq!(
        output,
        ":warning: Diff too large to display on Github\n\n### Changes Summary\n\
         | Removed | Modified | Added | Renamed |\n\
         | ------- | -------- | ----- | ------- |\n\
         | 1 | 1 | 1 | 1 |"
    );
    assert!(!output.contains("job1"));
}

#[test]
fn sections_above_threshold_are_collapsed() {
    let output = MarkdownFormatter
        .format(&many_added(7), &RenderOptions::default())
        .unwrap();
    assert!(output.starts_with("<details>\n<summary><h3>Added Jobs</h3></summary>\n<details>\n"));
    assert!(output.contains("</details>\n</details>\n\n### Changes Summary"));
}

#[test]
fn sections_at_threshold_stay_open() {
    let output = MarkdownFormatter
        .format(&many_added(6), &RenderOptions::default())
        .unwrap();
    assert!(output.starts_with("### Added Jobs\n"));
}

#[test]
fn removed_and_renamed_never_collapse() {
    let before: String = (0..8).map(|i| format!("old{i}:\n  script: s{i}\n")).collect();
    let diff = CiDiff::compute(&doc(&before), &Document::new());
    let options = RenderOptions {
        max_detailed_jobs: 1,
        ..RenderOptions::default()
    };
    let output = MarkdownFormatter.format(&diff, &options).unwrap();
    assert!(output.starts_with("### Removed Jobs\n- **old0**\n"));
    assert!(!output.contains("<details>"));
}
