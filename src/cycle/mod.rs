//! The automatic signal cycle - background task and its configuration.

pub mod config;
pub mod controller;

pub use config::{CycleConfig, DEFAULT_SIGNAL_TIME, validate_signal_time};
pub use controller::{CycleController, StartOutcome};
