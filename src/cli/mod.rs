//! CLI module for junction - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for running the daemon and
//! driving it: enqueue, dequeue, signal, start/stop, reset, status.

pub mod commands;

pub use commands::Cli;
