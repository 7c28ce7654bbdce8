use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use super::*;

fn create_git_repo() -> TempDir {
    let dir = TempDir::new().unwrap();

    Command::new("git")
        .args(["init"])
        .current_dir(dir.path())
        .output()
        .expect("Failed to init git repo");

    Command::new("git")
        .args(["config", "user.email", "test@test.com"])
        .current_dir(dir.path())
        .output()
        .expect("Failed to config git user email");

    Command::new("git")
        .args(["config", "user.name", "Test User"])
        .current_dir(dir.path())
        .output()
        .expect("Failed to config git user name");

    dir
}

fn create_file(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

fn git_commit_all(dir: &Path, message: &str) {
    Command::new("git")
        .args(["add", "."])
        .current_dir(dir)
        .output()
        .expect("Failed to git add");
    Command::new("git")
        .args(["commit", "-m", message])
        .current_dir(dir)
        .output()
        .expect("Failed to git commit");
}

#[test]
fn discover_fails_for_missing_path() {
    let result = GixObjects::discover(Path::new("/nonexistent/path/that/does/not/exist"));
    assert!(matches!(result, Err(CiDiffError::Git(_))));
}

#[test]
fn workdir_is_repository_root() {
    let dir = create_git_repo();
    let objects = GixObjects::discover(dir.path()).unwrap();

    let workdir = objects.workdir().unwrap().canonicalize().unwrap();
    assert_eq!(workdir, dir.path().canonicalize().unwrap());
}

#[test]
fn reads_file_at_revision() {
    let dir = create_git_repo();
    create_file(dir.path(), ".gitlab-ci.yml", "build:\n  script: make\n");
    git_commit_all(dir.path(), "first");
    create_file(dir.path(), ".gitlab-ci.yml", "build:\n  script: make all\n");
    git_commit_all(dir.path(), "second");

    let objects = GixObjects::discover(dir.path()).unwrap();
    assert_eq!(
        objects.read_blob("HEAD~1", ".gitlab-ci.yml").unwrap(),
        "build:\n  script: make\n"
    );
    assert_eq!(
        objects.read_blob("HEAD", ".gitlab-ci.yml").unwrap(),
        "build:\n  script: make all\n"
    );
}

#[test]
fn reads_nested_path() {
    let dir = create_git_repo();
    create_file(dir.path(), "ci/jobs.yml", "test:\n  script: cargo test\n");
    git_commit_all(dir.path(), "add jobs");

    let objects = GixObjects::discover(dir.path()).unwrap();
    assert_eq!(
        objects.read_blob("HEAD", "ci/jobs.yml").unwrap(),
        "test:\n  script: cargo test\n"
    );
}

#[test]
fn missing_path_is_unavailable() {
    let dir = create_git_repo();
    create_file(dir.path(), "a.yml", "a: 1\n");
    git_commit_all(dir.path(), "first");

    let objects = GixObjects::discover(dir.path()).unwrap();
    assert!(matches!(
        objects.read_blob("HEAD", "missing.yml"),
        Err(CiDiffError::SourceUnavailable { .. })
    ));
}

#[test]
fn directory_is_not_a_file() {
    let dir = create_git_repo();
    create_file(dir.path(), "ci/jobs.yml", "a: 1\n");
    git_commit_all(dir.path(), "first");

    let objects = GixObjects::discover(dir.path()).unwrap();
    match objects.read_blob("HEAD", "ci") {
        Err(CiDiffError::SourceUnavailable { reason, .. }) => {
            assert!(reason.contains("expected a file"));
        }
        other => panic!("expected SourceUnavailable, got {other:?}"),
    }
}
