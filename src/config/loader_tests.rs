use std::path::PathBuf;

use super::*;
use crate::source::test_fixtures::MemoryFileSystem;

fn loader(fs: MemoryFileSystem) -> FileConfigLoader<MemoryFileSystem> {
    FileConfigLoader::with_fs(fs).with_dirs(
        Some(PathBuf::from("/project")),
        Some(PathBuf::from("/home/user/.config/ci-config-diff")),
    )
}

#[test]
fn returns_default_when_no_config_found() {
    let config = loader(MemoryFileSystem::new()).load().unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn loads_local_config_from_current_directory() {
    let fs = MemoryFileSystem::new().with_file(
        "/project/.ci-config-diff.toml",
        "input_file = \"ci/main.yml\"\n\n[render]\nmax_detailed_jobs = 3\n",
    );
    let config = loader(fs).load().unwrap();
    assert_eq!(config.input_file, "ci/main.yml");
    assert_eq!(config.render.max_detailed_jobs, 3);
    assert_eq!(config.gitlab.url, "https://gitlab.com");
}

#[test]
fn loads_user_config_as_fallback() {
    let fs = MemoryFileSystem::new().with_file(
        "/home/user/.config/ci-config-diff/config.toml",
        "[gitlab]\nproject = \"group/app\"\n",
    );
    let config = loader(fs).load().unwrap();
    assert_eq!(config.gitlab.project.as_deref(), Some("group/app"));
}

#[test]
fn local_config_takes_priority_over_user_config() {
    let fs = MemoryFileSystem::new()
        .with_file("/project/.ci-config-diff.toml", "input_file = \"local.yml\"\n")
        .with_file(
            "/home/user/.config/ci-config-diff/config.toml",
            "input_file = \"user.yml\"\n",
        );
    let config = loader(fs).load().unwrap();
    assert_eq!(config.input_file, "local.yml");
}

#[test]
fn missing_dirs_fall_back_to_defaults() {
    let config = FileConfigLoader::with_fs(MemoryFileSystem::new())
        .with_dirs(None, None)
        .load()
        .unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn load_from_path_reports_missing_file() {
    let err = loader(MemoryFileSystem::new())
        .load_from_path(std::path::Path::new("/nowhere.toml"))
        .unwrap_err();
    assert_eq!(err.error_type(), "Config");
    assert!(err.to_string().contains("/nowhere.toml"));
}

#[test]
fn syntax_errors_are_parse_errors() {
    let fs = MemoryFileSystem::new().with_file("/project/.ci-config-diff.toml", "input_file = \n");
    let err = loader(fs).load().unwrap_err();
    assert!(matches!(err, CiDiffError::ConfigParse(_)));
}

#[test]
fn unknown_keys_are_rejected() {
    let fs = MemoryFileSystem::new().with_file("/project/.ci-config-diff.toml", "[render]\ncolour = true\n");
    assert!(loader(fs).load().is_err());
}

#[test]
fn invalid_values_fail_validation() {
    let fs = MemoryFileSystem::new().with_file(
        "/project/.ci-config-diff.toml",
        "[gitlab]\nurl = \"gitlab.example.com\"\n",
    );
    let err = loader(fs).load().unwrap_err();
    assert!(err.to_string().contains("gitlab.url"));
}
