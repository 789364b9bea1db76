//! IPC Layer - Unix socket surface for the daemon
//!
//! This module provides:
//! - Message types for requests and responses
//! - Unix socket server run by `junction serve`
//! - Request routing onto the command surface
//! - Client used by the CLI subcommands

pub mod client;
pub mod handlers;
pub mod messages;
pub mod server;

pub use client::{IpcClient, IpcClientConfig};
pub use handlers::ApiHandler;
pub use messages::{DaemonError, DaemonRequest, DaemonResponse, ErrorCode, Methods};
pub use server::{IpcServer, IpcServerConfig, RequestHandler};

use std::path::PathBuf;

/// Default Unix socket path for the daemon.
pub fn default_socket_path() -> PathBuf {
    PathBuf::from("/tmp/junction-daemon.sock")
}
