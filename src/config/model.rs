// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_DIR: &str = ".";
pub const DEFAULT_BUILD_CMD: &str = "echo default build command";
pub const DEFAULT_RESTART_CMD: &str = "echo default restart command";
pub const DEFAULT_SCAN_INTERVAL: &str = "6s";
pub const DEFAULT_RECHECK_INTERVAL: &str = "3s";
pub const DEFAULT_TIMEOUT: &str = "20s";

/// Optional configuration file.
///
/// ```toml
/// [watch]
/// dir = "."
/// ignore = ["target", ".git", "**/*.swp"]
/// scan_interval = "6s"
/// recheck_interval = "3s"
///
/// [action]
/// build = "cargo build"
/// restart = "pkill -HUP myapp"
/// timeout = "20s"
/// ```
///
/// All sections and keys are optional.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub action: ActionSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct WatchSection {
    /// Directory to poll.
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Locations (relative to `dir`) or glob patterns to leave out of scans.
    #[serde(default)]
    pub ignore: Vec<String>,

    #[serde(default)]
    pub scan_interval: Option<String>,

    #[serde(default)]
    pub recheck_interval: Option<String>,
}

/// `[action]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ActionSection {
    #[serde(default)]
    pub build: Option<String>,

    #[serde(default)]
    pub restart: Option<String>,

    /// Timeout for each of the two commands.
    #[serde(default)]
    pub timeout: Option<String>,
}

/// CLI flags and config file merged, but not yet validated.
///
/// Durations are still strings here; [`Settings`] is the checked form.
#[derive(Debug, Clone)]
pub struct RawSettings {
    pub dir: PathBuf,
    pub ignore: Vec<String>,
    pub build_cmd: String,
    pub restart_cmd: String,
    pub scan_interval: String,
    pub recheck_interval: String,
    pub timeout: String,
}

impl Default for RawSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_DIR),
            ignore: Vec::new(),
            build_cmd: DEFAULT_BUILD_CMD.to_string(),
            restart_cmd: DEFAULT_RESTART_CMD.to_string(),
            scan_interval: DEFAULT_SCAN_INTERVAL.to_string(),
            recheck_interval: DEFAULT_RECHECK_INTERVAL.to_string(),
            timeout: DEFAULT_TIMEOUT.to_string(),
        }
    }
}

/// Fully resolved runtime settings.
///
/// Only obtainable through `Settings::try_from(RawSettings)`, so every value
/// in here has been validated.
#[derive(Debug, Clone)]
pub struct Settings {
    root: PathBuf,
    ignore: Vec<String>,
    build_cmd: String,
    restart_cmd: String,
    scan_interval: Duration,
    recheck_interval: Duration,
    timeout: Duration,
}

impl Settings {
    pub(crate) fn new_unchecked(
        root: PathBuf,
        ignore: Vec<String>,
        build_cmd: String,
        restart_cmd: String,
        scan_interval: Duration,
        recheck_interval: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            root,
            ignore,
            build_cmd,
            restart_cmd,
            scan_interval,
            recheck_interval,
            timeout,
        }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    pub fn ignore(&self) -> &[String] {
        &self.ignore
    }

    pub fn build_cmd(&self) -> &str {
        &self.build_cmd
    }

    pub fn restart_cmd(&self) -> &str {
        &self.restart_cmd
    }

    pub fn scan_interval(&self) -> Duration {
        self.scan_interval
    }

    pub fn recheck_interval(&self) -> Duration {
        self.recheck_interval
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
