//! IPC message types for CLI ↔ Daemon communication.
//!
//! Uses JSON Lines (newline-delimited JSON) over Unix stream socket.
//! Message schema uses familiar field names (id, method, params, result,
//! error) but does NOT implement JSON-RPC 2.0 specification.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request sent from a client to the daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonRequest {
    /// Unique request ID for correlating responses.
    pub id: u64,
    /// Method name (e.g., "queue.enqueue", "cycle.start").
    pub method: String,
    /// Method parameters as JSON value.
    #[serde(default)]
    pub params: Value,
}

impl DaemonRequest {
    /// Create a new request with the given method and params.
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self {
            id,
            method: method.into(),
            params,
        }
    }

    /// Create a request with no parameters.
    pub fn no_params(id: u64, method: impl Into<String>) -> Self {
        Self::new(id, method, Value::Object(Default::default()))
    }
}

/// Response sent from the daemon to a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonResponse {
    /// Request ID this response corresponds to.
    pub id: u64,
    /// Result value on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error details on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<DaemonError>,
}

impl DaemonResponse {
    /// Create a success response.
    pub fn success(id: u64, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: u64, error: DaemonError) -> Self {
        Self {
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Check if this response indicates success.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Error details in a daemon response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonError {
    /// Error code.
    pub code: i32,
    /// Human-readable error message.
    pub message: String,
}

impl DaemonError {
    /// Create a new error.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Parse error (-32700).
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PARSE_ERROR, message)
    }

    /// Method not found error (-32601).
    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::METHOD_NOT_FOUND,
            format!("Unknown method: {}", method.into()),
        )
    }

    /// Invalid params error (-32602).
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::INVALID_PARAMS, message)
    }

    /// Internal error (-32603).
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::INTERNAL_ERROR, message)
    }
}

/// Standard error codes.
pub struct ErrorCode;

impl ErrorCode {
    /// Invalid JSON.
    pub const PARSE_ERROR: i32 = -32700;
    /// Unknown method.
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid parameters.
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal daemon error.
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// Known method names as constants.
pub struct Methods;

impl Methods {
    // Connection
    pub const PING: &'static str = "ping";

    // Queues
    pub const QUEUE_ENQUEUE: &'static str = "queue.enqueue";
    pub const QUEUE_DEQUEUE: &'static str = "queue.dequeue";

    // Signal
    pub const SIGNAL_CHANGE: &'static str = "signal.change";

    // Auto cycle
    pub const CYCLE_START: &'static str = "cycle.start";
    pub const CYCLE_STOP: &'static str = "cycle.stop";

    // System
    pub const SYSTEM_RESET: &'static str = "system.reset";
    pub const SYSTEM_STATUS: &'static str = "system.status";
    pub const SYSTEM_EXPLAIN: &'static str = "system.explain";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daemon_request_new() {
        let req = DaemonRequest::new(1, "queue.enqueue", serde_json::json!({"lane": "North"}));
        assert_eq!(req.id, 1);
        assert_eq!(req.method, "queue.enqueue");
        assert_eq!(req.params["lane"], "North");
    }

    #[test]
    fn test_daemon_request_no_params() {
        let req = DaemonRequest::no_params(42, "ping");
        assert_eq!(req.id, 42);
        assert_eq!(req.method, "ping");
        assert!(req.params.is_object());
    }

    #[test]
    fn test_daemon_response_success() {
        let resp = DaemonResponse::success(1, serde_json::json!({"queue": []}));
        assert!(resp.is_success());
        assert!(resp.result.is_some());
        assert!(resp.error.is_none());
    }

    #[test]
    fn test_daemon_response_error() {
        let resp = DaemonResponse::error(1, DaemonError::method_not_found("bogus"));
        assert!(!resp.is_success());
        assert!(resp.result.is_none());
        assert!(resp.error.is_some());
    }

    #[test]
    fn test_daemon_error_codes() {
        assert_eq!(DaemonError::parse_error("test").code, ErrorCode::PARSE_ERROR);
        assert_eq!(
            DaemonError::method_not_found("test").code,
            ErrorCode::METHOD_NOT_FOUND
        );
        assert_eq!(
            DaemonError::invalid_params("test").code,
            ErrorCode::INVALID_PARAMS
        );
        assert_eq!(
            DaemonError::internal_error("test").code,
            ErrorCode::INTERNAL_ERROR
        );
    }

    #[test]
    fn test_methods_constants() {
        assert_eq!(Methods::QUEUE_ENQUEUE, "queue.enqueue");
        assert_eq!(Methods::CYCLE_START, "cycle.start");
        assert_eq!(Methods::SYSTEM_STATUS, "system.status");
    }

    #[test]
    fn test_request_roundtrip() {
        let req = DaemonRequest::new(123, "signal.change", serde_json::json!({"signal": "South"}));
        let json = serde_json::to_string(&req).unwrap();
        let parsed: DaemonRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, 123);
        assert_eq!(parsed.method, "signal.change");
        assert_eq!(parsed.params["signal"], "South");
    }

    #[test]
    fn test_response_roundtrip() {
        let resp = DaemonResponse::success(1, serde_json::json!({"message": "ok"}));
        let json = serde_json::to_string(&resp).unwrap();
        let parsed: DaemonResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, 1);
        assert!(parsed.is_success());
    }

    #[test]
    fn test_request_missing_params_defaults_to_null() {
        let req: DaemonRequest = serde_json::from_str(r#"{"id":1,"method":"ping"}"#).unwrap();
        assert!(req.params.is_null());
    }
}
