//! Error types for Junction
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in Junction
#[derive(Debug, Error)]
pub enum JunctionError {
    /// Lane name is not one of the four fixed directions
    #[error("Invalid lane: {0}")]
    InvalidLane(String),

    /// Requested green-phase duration is not a positive number of seconds
    #[error("Invalid signal time: {0}")]
    InvalidSignalTime(i64),

    /// IPC communication error
    #[error("IPC error: {0}")]
    Ipc(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Junction operations
pub type Result<T> = std::result::Result<T, JunctionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_lane_error() {
        let err = JunctionError::InvalidLane("Northeast".to_string());
        assert_eq!(err.to_string(), "Invalid lane: Northeast");
    }

    #[test]
    fn test_invalid_signal_time_error() {
        let err = JunctionError::InvalidSignalTime(-3);
        assert_eq!(err.to_string(), "Invalid signal time: -3");
    }

    #[test]
    fn test_ipc_error() {
        let err = JunctionError::Ipc("connection refused".to_string());
        assert_eq!(err.to_string(), "IPC error: connection refused");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "socket not found");
        let err: JunctionError = io_err.into();
        assert!(matches!(err, JunctionError::Io(_)));
        assert!(err.to_string().contains("socket not found"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(JunctionError::InvalidLane("nope".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
