// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::cli::CliArgs;
use crate::config::model::{ConfigFile, RawSettings, Settings};
use crate::errors::Result;

/// Load a configuration file from a given path.
///
/// This only performs TOML deserialization; values are checked once they
/// have been merged with the CLI flags (see [`load_settings`]).
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: ConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Merge CLI flags over an optional config file over the built-in defaults.
///
/// Ignore lists are concatenated (file entries first) rather than replaced,
/// so a project file can carry the usual suspects and the command line can
/// add more.
pub fn merge(args: &CliArgs, file: Option<ConfigFile>) -> RawSettings {
    let file = file.unwrap_or_default();
    let defaults = RawSettings::default();

    let mut ignore = file.watch.ignore;
    ignore.extend(args.ignore.iter().cloned());
    ignore.retain(|entry| !entry.trim().is_empty());

    RawSettings {
        dir: pick(args.dir.clone(), file.watch.dir, defaults.dir),
        ignore,
        build_cmd: pick(args.build_cmd.clone(), file.action.build, defaults.build_cmd),
        restart_cmd: pick(
            args.restart_cmd.clone(),
            file.action.restart,
            defaults.restart_cmd,
        ),
        scan_interval: pick(
            args.scan_interval.clone(),
            file.watch.scan_interval,
            defaults.scan_interval,
        ),
        recheck_interval: pick(
            args.recheck_interval.clone(),
            file.watch.recheck_interval,
            defaults.recheck_interval,
        ),
        timeout: pick(args.timeout.clone(), file.action.timeout, defaults.timeout),
    }
}

fn pick<T>(cli: Option<T>, file: Option<T>, default: T) -> T {
    cli.or(file).unwrap_or(default)
}

/// Resolve the effective [`Settings`] for a run.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads the TOML file named by `--config`, if any.
/// - Applies CLI overrides and built-in defaults.
/// - Validates durations, commands and the watched directory.
pub fn load_settings(args: &CliArgs) -> Result<Settings> {
    let file = match args.config.as_deref() {
        Some(path) => Some(load_from_path(path)?),
        None => None,
    };
    let raw = merge(args, file);
    Settings::try_from(raw)
}
