// tests/config_loading.rs

use std::error::Error;
use std::io::Write;
use std::time::Duration;

use clap::Parser;
use tempfile::{tempdir, NamedTempFile};

use pollen::cli::CliArgs;
use pollen::config::{load_from_path, load_settings, merge, Settings};
use pollen::errors::PollenError;
use pollen_test_utils::builders::SettingsBuilder;

type TestResult = Result<(), Box<dyn Error>>;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn defaults_apply_when_nothing_is_given() -> TestResult {
    let args = CliArgs::parse_from(["pollen"]);
    let settings = load_settings(&args)?;

    assert_eq!(settings.root(), std::path::Path::new("."));
    assert_eq!(settings.build_cmd(), "echo default build command");
    assert_eq!(settings.restart_cmd(), "echo default restart command");
    assert_eq!(settings.scan_interval(), Duration::from_secs(6));
    assert_eq!(settings.recheck_interval(), Duration::from_secs(3));
    assert_eq!(settings.timeout(), Duration::from_secs(20));
    assert!(settings.ignore().is_empty());

    Ok(())
}

#[test]
fn file_values_are_read_and_cli_overrides_them() -> TestResult {
    let dir = tempdir()?;
    let file = config_file(&format!(
        r#"
[watch]
dir = {:?}
ignore = ["target", "**/*.swp"]
scan_interval = "7s"

[action]
build = "cargo build"
restart = "./restart.sh"
timeout = "45s"
"#,
        dir.path()
    ));

    let parsed = load_from_path(file.path())?;
    assert_eq!(parsed.watch.ignore, vec!["target", "**/*.swp"]);

    let args = CliArgs::parse_from([
        "pollen",
        "--config",
        file.path().to_str().unwrap(),
        "--build-cmd",
        "make",
        "--ignore",
        "build,dist",
        "--timeout",
        "5s",
    ]);
    let settings = load_settings(&args)?;

    assert_eq!(settings.root(), dir.path());
    assert_eq!(settings.build_cmd(), "make");
    assert_eq!(settings.restart_cmd(), "./restart.sh");
    assert_eq!(settings.scan_interval(), Duration::from_secs(7));
    assert_eq!(settings.recheck_interval(), Duration::from_secs(3));
    assert_eq!(settings.timeout(), Duration::from_secs(5));
    assert_eq!(settings.ignore().to_vec(), vec!["target", "**/*.swp", "build", "dist"]);

    Ok(())
}

#[test]
fn invalid_duration_is_a_config_error() {
    let dir = tempdir().unwrap();
    let raw = SettingsBuilder::new(dir.path()).recheck_interval("soon").raw();

    match Settings::try_from(raw) {
        Err(PollenError::ConfigError(msg)) => assert!(msg.contains("recheck_interval")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn zero_timeout_is_rejected() {
    let dir = tempdir().unwrap();
    let raw = SettingsBuilder::new(dir.path()).timeout("0s").raw();

    match Settings::try_from(raw) {
        Err(PollenError::ConfigError(msg)) => assert!(msg.contains("greater than zero")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn empty_build_command_is_rejected() {
    let dir = tempdir().unwrap();
    let raw = SettingsBuilder::new(dir.path()).build_cmd("   ").raw();
    assert!(matches!(
        Settings::try_from(raw),
        Err(PollenError::ConfigError(_))
    ));
}

#[test]
fn watched_dir_must_be_a_directory() {
    let file = config_file("");
    let raw = SettingsBuilder::new(file.path()).raw();

    match Settings::try_from(raw) {
        Err(PollenError::ConfigError(msg)) => assert!(msg.contains("not a directory")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn malformed_toml_is_a_toml_error() {
    let file = config_file("[watch\nignore = ");
    assert!(matches!(
        load_from_path(file.path()),
        Err(PollenError::TomlError(_))
    ));
}

#[test]
fn merge_drops_blank_ignore_entries() {
    let args = CliArgs::parse_from(["pollen", "--ignore", "a,,b"]);
    let raw = merge(&args, None);
    assert_eq!(raw.ignore, vec!["a", "b"]);
}
