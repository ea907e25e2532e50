// src/config/validate.rs

use std::time::Duration;

use crate::config::duration::parse_duration;
use crate::config::model::{RawSettings, Settings};
use crate::errors::{PollenError, Result};

impl TryFrom<RawSettings> for Settings {
    type Error = PollenError;

    fn try_from(raw: RawSettings) -> std::result::Result<Self, Self::Error> {
        validate_commands(&raw)?;
        validate_root(&raw)?;
        let scan_interval = positive_duration("scan_interval", &raw.scan_interval)?;
        let recheck_interval = positive_duration("recheck_interval", &raw.recheck_interval)?;
        let timeout = positive_duration("timeout", &raw.timeout)?;

        Ok(Settings::new_unchecked(
            raw.dir,
            raw.ignore,
            raw.build_cmd,
            raw.restart_cmd,
            scan_interval,
            recheck_interval,
            timeout,
        ))
    }
}

fn validate_commands(raw: &RawSettings) -> Result<()> {
    if raw.build_cmd.trim().is_empty() {
        return Err(PollenError::ConfigError(
            "build command must not be empty".to_string(),
        ));
    }
    if raw.restart_cmd.trim().is_empty() {
        return Err(PollenError::ConfigError(
            "restart command must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_root(raw: &RawSettings) -> Result<()> {
    let meta = std::fs::metadata(&raw.dir).map_err(|e| {
        PollenError::ConfigError(format!("watched dir {:?} is not accessible: {e}", raw.dir))
    })?;
    if !meta.is_dir() {
        return Err(PollenError::ConfigError(format!(
            "watched dir {:?} is not a directory",
            raw.dir
        )));
    }
    Ok(())
}

fn positive_duration(field: &str, value: &str) -> Result<Duration> {
    let duration = parse_duration(value)
        .map_err(|e| PollenError::ConfigError(format!("{field}: {e}")))?;
    if duration.is_zero() {
        return Err(PollenError::ConfigError(format!(
            "{field} must be greater than zero (got {value:?})"
        )));
    }
    Ok(duration)
}
