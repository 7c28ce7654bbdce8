#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Creates an `assert_cmd` Command for the ci-config-diff binary.
#[macro_export]
macro_rules! ci_config_diff {
    () => {{
        let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("ci-config-diff"));
        cmd.env_remove("RUST_LOG").env("NO_COLOR", "1");
        cmd
    }};
}

/// Temporary project directory holding CI configuration files.
pub struct TestFixture {
    pub dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Creates a file (and its parent directories) in the temp directory.
    pub fn create_file(&self, relative_path: &str, content: &str) {
        let path = self.dir.path().join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write file");
    }

    /// Creates a `.ci-config-diff.toml` in the temp directory.
    pub fn create_config(&self, content: &str) {
        self.create_file(".ci-config-diff.toml", content);
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn read(&self, relative_path: &str) -> String {
        fs::read_to_string(self.dir.path().join(relative_path)).expect("Failed to read file")
    }

    /// Turns the directory into a git repository with a test identity.
    pub fn init_git(&self) {
        self.git(&["init"]);
        self.git(&["config", "user.email", "test@test.com"]);
        self.git(&["config", "user.name", "Test User"]);
    }

    /// Stages everything and commits it.
    pub fn commit_all(&self, message: &str) {
        self.git(&["add", "."]);
        self.git(&["commit", "-m", message]);
    }

    fn git(&self, args: &[&str]) {
        Command::new("git")
            .args(args)
            .current_dir(self.dir.path())
            .output()
            .expect("Failed to run git");
    }
}

pub const BASIC_BEFORE: &str = "\
job1:
  script:
    - a
    - b
    - c
job2:
  script:
    - x
";

pub const BASIC_AFTER: &str = "\
job1:
  script:
    - a
    - z
    - c
job3:
  script:
    - y
";
