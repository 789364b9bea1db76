//! IPC Server - Unix socket server for CLI-daemon communication
//!
//! Provides:
//! - Unix stream socket listener
//! - Client connection handling
//! - Request routing and response sending

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::{JunctionError, Result};
use crate::ipc::default_socket_path;
use crate::ipc::messages::{DaemonError, DaemonRequest, DaemonResponse};

/// Configuration for the IPC server
#[derive(Debug, Clone)]
pub struct IpcServerConfig {
    /// Path to the Unix socket
    pub socket_path: PathBuf,
}

impl Default for IpcServerConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
        }
    }
}

impl IpcServerConfig {
    /// Create config with custom socket path
    pub fn with_socket_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.socket_path = path.as_ref().to_path_buf();
        self
    }
}

/// Handler trait for processing requests
pub trait RequestHandler: Send + Sync {
    /// Handle a request and return a response
    fn handle(
        &self,
        request: DaemonRequest,
    ) -> impl std::future::Future<Output = DaemonResponse> + Send;
}

/// IPC Server for daemon communication
pub struct IpcServer {
    config: IpcServerConfig,
    /// Shutdown signal
    shutdown_tx: Option<mpsc::Sender<()>>,
}

impl IpcServer {
    /// Create a new IPC server with default config
    pub fn new() -> Self {
        Self::with_config(IpcServerConfig::default())
    }

    /// Create a new IPC server with custom config
    pub fn with_config(config: IpcServerConfig) -> Self {
        Self {
            config,
            shutdown_tx: None,
        }
    }

    /// Get the socket path
    pub fn socket_path(&self) -> &Path {
        &self.config.socket_path
    }

    /// Run the server with a request handler
    pub async fn run<H: RequestHandler + 'static>(&mut self, handler: Arc<H>) -> Result<()> {
        // Remove existing socket if present
        if self.config.socket_path.exists() {
            std::fs::remove_file(&self.config.socket_path)?;
        }

        // Ensure parent directory exists
        if let Some(parent) = self.config.socket_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let listener = UnixListener::bind(&self.config.socket_path)
            .map_err(|e| JunctionError::Ipc(format!("Failed to bind socket: {}", e)))?;
        debug!(path = %self.config.socket_path.display(), "IPC server listening");

        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        self.shutdown_tx = Some(shutdown_tx);

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, _addr)) => {
                            let handler_clone = Arc::clone(&handler);
                            tokio::spawn(async move {
                                let _ = handle_client(stream, handler_clone).await;
                            });
                        }
                        Err(e) => {
                            warn!("Accept error: {}", e);
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    break;
                }
            }
        }

        // Cleanup socket
        let _ = std::fs::remove_file(&self.config.socket_path);
        Ok(())
    }

    /// Signal the server to shutdown
    pub async fn shutdown(&self) -> Result<()> {
        if let Some(tx) = &self.shutdown_tx {
            let _ = tx.send(()).await;
        }
        Ok(())
    }
}

impl Default for IpcServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle a single client connection
async fn handle_client<H: RequestHandler>(stream: UnixStream, handler: Arc<H>) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => break, // EOF - client disconnected
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                let response = match serde_json::from_str::<DaemonRequest>(trimmed) {
                    Ok(request) => handler.handle(request).await,
                    Err(e) => DaemonResponse::error(
                        0,
                        DaemonError::parse_error(format!("Parse error: {}", e)),
                    ),
                };

                let response_json = serde_json::to_string(&response).unwrap_or_default();
                if writer.write_all(response_json.as_bytes()).await.is_err() {
                    break;
                }
                if writer.write_all(b"\n").await.is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    }

    Ok(())
}
