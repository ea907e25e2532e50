#![allow(dead_code)]

use std::path::Path;

use pollen::config::{RawSettings, Settings};

/// Builder for `Settings` to simplify test setup.
///
/// Starts from the built-in defaults but with short intervals so pipeline
/// tests finish quickly.
pub struct SettingsBuilder {
    raw: RawSettings,
}

impl SettingsBuilder {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            raw: RawSettings {
                dir: dir.as_ref().to_path_buf(),
                scan_interval: "40ms".to_string(),
                recheck_interval: "20ms".to_string(),
                timeout: "2s".to_string(),
                ..RawSettings::default()
            },
        }
    }

    pub fn ignore(mut self, entry: &str) -> Self {
        self.raw.ignore.push(entry.to_string());
        self
    }

    pub fn build_cmd(mut self, cmd: &str) -> Self {
        self.raw.build_cmd = cmd.to_string();
        self
    }

    pub fn restart_cmd(mut self, cmd: &str) -> Self {
        self.raw.restart_cmd = cmd.to_string();
        self
    }

    pub fn scan_interval(mut self, d: &str) -> Self {
        self.raw.scan_interval = d.to_string();
        self
    }

    pub fn recheck_interval(mut self, d: &str) -> Self {
        self.raw.recheck_interval = d.to_string();
        self
    }

    pub fn timeout(mut self, d: &str) -> Self {
        self.raw.timeout = d.to_string();
        self
    }

    pub fn raw(self) -> RawSettings {
        self.raw
    }

    pub fn build(self) -> Settings {
        Settings::try_from(self.raw).expect("Failed to build valid settings from builder")
    }
}
