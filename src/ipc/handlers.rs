//! Request routing for the daemon.
//!
//! Maps IPC methods onto the command surface and converts the typed command
//! responses into JSON result payloads. Command-level failures (an invalid
//! lane name, say) surface as success responses with an explanatory message;
//! only malformed requests get protocol-level errors.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Value, json};
use tracing::warn;

use crate::api::CommandApi;
use crate::ipc::messages::{DaemonError, DaemonRequest, DaemonResponse, Methods};
use crate::ipc::server::RequestHandler;

/// Routes daemon requests to the command surface.
pub struct ApiHandler {
    api: Arc<CommandApi>,
}

impl ApiHandler {
    /// Create a handler over the shared command surface.
    pub fn new(api: Arc<CommandApi>) -> Self {
        Self { api }
    }

    async fn dispatch(&self, request: DaemonRequest) -> DaemonResponse {
        let DaemonRequest { id, method, params } = request;
        match method.as_str() {
            Methods::PING => DaemonResponse::success(id, json!({"pong": true})),

            Methods::QUEUE_ENQUEUE => {
                let vehicle = match optional_str(&params, "vehicle") {
                    Ok(v) => v.map(str::to_string),
                    Err(e) => return DaemonResponse::error(id, e),
                };
                let lane = match optional_str(&params, "lane") {
                    Ok(v) => v.map(str::to_string),
                    Err(e) => return DaemonResponse::error(id, e),
                };
                success(id, &self.api.enqueue(vehicle, lane.as_deref()).await)
            }

            Methods::QUEUE_DEQUEUE => success(id, &self.api.dequeue().await),

            Methods::SIGNAL_CHANGE => match params["signal"].as_str() {
                Some(signal) => success(id, &self.api.change_signal(signal).await),
                None => DaemonResponse::error(
                    id,
                    DaemonError::invalid_params("Missing 'signal' parameter"),
                ),
            },

            Methods::CYCLE_START => {
                let signal_time = params["signal_time"].as_i64();
                if signal_time.is_none() && !params["signal_time"].is_null() {
                    warn!(value = %params["signal_time"], "Ignoring non-integer signal_time");
                }
                success(id, &self.api.start_auto(signal_time).await)
            }

            Methods::CYCLE_STOP => success(id, &self.api.stop_auto().await),

            Methods::SYSTEM_RESET => success(id, &self.api.reset().await),

            Methods::SYSTEM_STATUS => success(id, &self.api.status().await),

            Methods::SYSTEM_EXPLAIN => success(id, &self.api.explain()),

            other => DaemonResponse::error(id, DaemonError::method_not_found(other)),
        }
    }
}

impl RequestHandler for ApiHandler {
    fn handle(
        &self,
        request: DaemonRequest,
    ) -> impl std::future::Future<Output = DaemonResponse> + Send {
        self.dispatch(request)
    }
}

/// Serialize a command response into a success payload.
fn success<T: Serialize>(id: u64, response: &T) -> DaemonResponse {
    match serde_json::to_value(response) {
        Ok(value) => DaemonResponse::success(id, value),
        Err(e) => DaemonResponse::error(id, DaemonError::internal_error(e.to_string())),
    }
}

/// Read an optional string parameter; present-but-not-a-string is an error.
fn optional_str<'a>(params: &'a Value, key: &str) -> Result<Option<&'a str>, DaemonError> {
    match &params[key] {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        _ => Err(DaemonError::invalid_params(format!(
            "Parameter '{}' must be a string",
            key
        ))),
    }
}
