// src/watch/mod.rs

//! Polling change detection.
//!
//! This module is responsible for:
//! - Describing which paths to leave out (`ignore`).
//! - Crawling the watched tree into immutable [`Snapshot`]s (`scanner`).
//! - Deciding, on its own timer, whether anything changed since the last
//!   look (`tracker`).
//!
//! It does **not** run commands; it only emits triggers through the
//! dispatcher.

pub mod ignore;
pub mod path_utils;
pub mod scanner;
pub mod snapshot;
pub mod tracker;

pub use ignore::{IgnorePolicy, IgnorePredicate};
pub use scanner::{scan, snapshot_channel, Scanner, SnapshotReceiver, SnapshotSender};
pub use snapshot::Snapshot;
pub use tracker::{check, needs_action, ChangeReport, ModTimeCache, Tracker};
