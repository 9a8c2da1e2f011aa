// src/engine/mod.rs

//! Orchestration of tracker passes.
//!
//! The synchronous pass logic lives in [`core`]; the polling loop with its
//! cancellable wait is implemented in [`runtime`].

pub mod core;
pub mod runtime;

pub use self::core::{PassSummary, Tracker, TrackerOptions};
pub use runtime::{RunReport, Runtime};
