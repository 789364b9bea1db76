//! IPC client for the CLI to communicate with the daemon.
//!
//! Provides async connection to the daemon Unix socket with request/response
//! correlation over newline-delimited JSON.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tokio::sync::{Mutex, oneshot};

use crate::error::{JunctionError, Result};
use crate::ipc::default_socket_path;
use crate::ipc::messages::{DaemonRequest, DaemonResponse, Methods};

/// Configuration for IPC client.
#[derive(Debug, Clone)]
pub struct IpcClientConfig {
    /// Path to daemon Unix socket.
    pub socket_path: PathBuf,
    /// Request timeout in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for IpcClientConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            request_timeout_ms: 30000,
        }
    }
}

impl IpcClientConfig {
    /// Create config with custom socket path.
    pub fn with_socket(path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: path.into(),
            ..Default::default()
        }
    }
}

/// Pending request awaiting response.
struct PendingRequest {
    sender: oneshot::Sender<DaemonResponse>,
}

/// IPC client for communicating with the daemon.
pub struct IpcClient {
    config: IpcClientConfig,
    writer: Arc<Mutex<Option<tokio::io::WriteHalf<UnixStream>>>>,
    pending: Arc<Mutex<HashMap<u64, PendingRequest>>>,
    next_id: AtomicU64,
    connected: AtomicBool,
}

impl IpcClient {
    /// Create a new IPC client with config.
    pub fn new(config: IpcClientConfig) -> Self {
        Self {
            config,
            writer: Arc::new(Mutex::new(None)),
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(1),
            connected: AtomicBool::new(false),
        }
    }

    /// Create client with default config.
    pub fn with_default_config() -> Self {
        Self::new(IpcClientConfig::default())
    }

    /// Create client with socket path.
    pub fn with_socket(path: impl Into<PathBuf>) -> Self {
        Self::new(IpcClientConfig::with_socket(path))
    }

    /// Connect to the daemon.
    pub async fn connect(&self) -> Result<()> {
        let stream = UnixStream::connect(&self.config.socket_path)
            .await
            .map_err(|e| JunctionError::Ipc(format!("Failed to connect: {}", e)))?;

        let (reader, writer) = tokio::io::split(stream);

        // Store writer
        {
            let mut w = self.writer.lock().await;
            *w = Some(writer);
        }
        self.connected.store(true, Ordering::SeqCst);

        // Spawn reader task
        let pending = Arc::clone(&self.pending);
        tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => break, // EOF - connection closed
                    Ok(_) => {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }

                        if let Ok(response) = serde_json::from_str::<DaemonResponse>(line) {
                            let mut pending_guard = pending.lock().await;
                            if let Some(req) = pending_guard.remove(&response.id) {
                                let _ = req.sender.send(response);
                            }
                        }
                        // Unknown message shape - ignore
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(())
    }

    /// Check if connected.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Get socket path.
    pub fn socket_path(&self) -> &Path {
        &self.config.socket_path
    }

    /// Send a request and wait for the matching response.
    pub async fn request(&self, method: &str, params: serde_json::Value) -> Result<DaemonResponse> {
        if !self.is_connected() {
            return Err(JunctionError::Ipc("Not connected".into()));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let request = DaemonRequest::new(id, method, params);

        // Create response channel
        let (tx, rx) = oneshot::channel();

        // Register pending request
        {
            let mut pending = self.pending.lock().await;
            pending.insert(id, PendingRequest { sender: tx });
        }

        // Send request
        {
            let mut writer = self.writer.lock().await;
            if let Some(w) = writer.as_mut() {
                let json = serde_json::to_string(&request)
                    .map_err(|e| JunctionError::Ipc(format!("Failed to serialize: {}", e)))?;
                w.write_all(json.as_bytes())
                    .await
                    .map_err(|e| JunctionError::Ipc(format!("Failed to write: {}", e)))?;
                w.write_all(b"\n")
                    .await
                    .map_err(|e| JunctionError::Ipc(format!("Failed to write newline: {}", e)))?;
                w.flush()
                    .await
                    .map_err(|e| JunctionError::Ipc(format!("Failed to flush: {}", e)))?;
            } else {
                // Remove pending request
                let mut pending = self.pending.lock().await;
                pending.remove(&id);
                return Err(JunctionError::Ipc("Writer not available".into()));
            }
        }

        // Wait for response with timeout
        let timeout = tokio::time::Duration::from_millis(self.config.request_timeout_ms);
        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => Err(JunctionError::Ipc("Response channel closed".into())),
            Err(_) => {
                // Timeout - remove pending request
                let mut pending = self.pending.lock().await;
                pending.remove(&id);
                Err(JunctionError::Ipc("Request timeout".into()))
            }
        }
    }

    /// Send a request with no parameters.
    pub async fn request_no_params(&self, method: &str) -> Result<DaemonResponse> {
        self.request(method, serde_json::json!({})).await
    }

    // Convenience methods for the daemon surface

    /// Check the daemon is responsive.
    pub async fn ping(&self) -> Result<bool> {
        let response = self.request_no_params(Methods::PING).await?;
        Ok(response.is_success())
    }

    /// Add a vehicle to a lane queue.
    pub async fn enqueue(&self, vehicle: Option<&str>, lane: Option<&str>) -> Result<DaemonResponse> {
        self.request(
            Methods::QUEUE_ENQUEUE,
            serde_json::json!({ "vehicle": vehicle, "lane": lane }),
        )
        .await
    }

    /// Remove the front vehicle from the active lane.
    pub async fn dequeue(&self) -> Result<DaemonResponse> {
        self.request_no_params(Methods::QUEUE_DEQUEUE).await
    }

    /// Manually set the green lane.
    pub async fn change_signal(&self, signal: &str) -> Result<DaemonResponse> {
        self.request(Methods::SIGNAL_CHANGE, serde_json::json!({ "signal": signal }))
            .await
    }

    /// Start the automatic cycle.
    pub async fn start_auto(&self, signal_time: Option<i64>) -> Result<DaemonResponse> {
        self.request(
            Methods::CYCLE_START,
            serde_json::json!({ "signal_time": signal_time }),
        )
        .await
    }

    /// Stop the automatic cycle.
    pub async fn stop_auto(&self) -> Result<DaemonResponse> {
        self.request_no_params(Methods::CYCLE_STOP).await
    }

    /// Clear all queues and stop the cycle.
    pub async fn reset(&self) -> Result<DaemonResponse> {
        self.request_no_params(Methods::SYSTEM_RESET).await
    }

    /// Fetch queues and signal state.
    pub async fn status(&self) -> Result<DaemonResponse> {
        self.request_no_params(Methods::SYSTEM_STATUS).await
    }

    /// Fetch the static service description.
    pub async fn explain(&self) -> Result<DaemonResponse> {
        self.request_no_params(Methods::SYSTEM_EXPLAIN).await
    }
}
