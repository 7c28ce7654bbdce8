//! Integration tests for the `init` command.

mod common;

use common::TestFixture;
use predicates::prelude::*;

#[test]
fn init_creates_default_config_file() {
    let fixture = TestFixture::new();

    ci_config_diff!()
        .current_dir(fixture.path())
        .args(["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    let content = fixture.read(".ci-config-diff.toml");
    assert!(content.contains("input_file = \".gitlab-ci.yml\""));
    assert!(content.contains("[gitlab]"));
}

#[test]
fn init_fails_if_config_exists() {
    let fixture = TestFixture::new();
    fixture.create_config("# existing config\n");

    ci_config_diff!()
        .current_dir(fixture.path())
        .args(["init"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(fixture.read(".ci-config-diff.toml"), "# existing config\n");
}

#[test]
fn init_force_overwrites() {
    let fixture = TestFixture::new();
    fixture.create_config("# existing config\n");

    ci_config_diff!()
        .current_dir(fixture.path())
        .args(["init", "--force"])
        .assert()
        .success();

    assert!(fixture.read(".ci-config-diff.toml").contains("[render]"));
}

#[test]
fn init_config_is_picked_up() {
    let fixture = TestFixture::new();
    fixture.create_file(".gitlab-ci.yml", "build:\n  script: make\n");

    ci_config_diff!()
        .current_dir(fixture.path())
        .args(["init"])
        .assert()
        .success();

    ci_config_diff!()
        .current_dir(fixture.path())
        .args(["resolve"])
        .assert()
        .success()
        .stdout("build:\n  script: make\n");
}
