// src/config/mod.rs

//! Configuration loading and validation for pollen.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk and merge it with CLI flags (`loader.rs`).
//! - Validate the merged values and produce typed [`Settings`] (`validate.rs`).
//! - Parse duration strings such as `"6s"` (`duration.rs`).

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use duration::parse_duration;
pub use loader::{load_from_path, load_settings, merge};
pub use model::{ActionSection, ConfigFile, RawSettings, Settings, WatchSection};
