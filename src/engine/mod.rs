// src/engine/mod.rs

//! Action side of the pipeline.
//!
//! - [`dispatcher`] is the single-slot, coalescing trigger channel between
//!   the tracker and the action runner.
//! - [`runner`] executes build and (on success) restart, strictly one cycle
//!   at a time.
//! - [`pipeline`] spawns scanner, tracker and runner and wires them together.

pub mod dispatcher;
pub mod pipeline;
pub mod runner;

pub use dispatcher::{dispatcher, Dispatcher, SignalOutcome, Trigger, TriggerReceiver};
pub use pipeline::{spawn_pipeline, PipelineHandle};
pub use runner::{ActionCommands, ActionRunner, CycleReport, StageResult};
