//! The command surface - synchronous operations against the shared state.

pub mod commands;

pub use commands::{CommandApi, ExplainResponse, MessageResponse, QueueResponse, StatusResponse};
