// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] provides the `CommandRunner` trait the action runner talks
//!   to, so tests can swap in a fake that never spawns processes.
//! - [`shell`] is the production implementation: `sh -c` (or `cmd /C`) via
//!   `tokio::process::Command`, with combined output and a hard timeout.

pub mod backend;
pub mod shell;

pub use backend::{CommandResult, CommandRunner};
pub use shell::ShellCommandRunner;
