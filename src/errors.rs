// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::CommandOutcome;

#[derive(Error, Debug)]
pub enum PollenError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// A single entry could not be listed during a scan. Never fatal.
    #[error("scan entry {path:?}: {source}")]
    ScanEntry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("build failed: {0}")]
    BuildFailure(CommandOutcome),

    #[error("restart failed: {0}")]
    RestartFailure(CommandOutcome),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PollenError>;
