//! Cycle timing configuration.

use crate::error::{JunctionError, Result};

/// Default green-phase duration in seconds.
pub const DEFAULT_SIGNAL_TIME: u64 = 3;

/// Timing for the automatic cycle.
///
/// `signal_time` is the green-phase duration in seconds and also the dequeue
/// cadence: one dequeue attempt per elapsed green second. It only changes
/// while the cycle is stopped and is latched at each green phase start.
#[derive(Debug, Clone)]
pub struct CycleConfig {
    /// Green-phase duration in seconds. Always positive.
    pub signal_time: u64,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            signal_time: DEFAULT_SIGNAL_TIME,
        }
    }
}

impl CycleConfig {
    /// Create a config with the given green-phase duration.
    pub fn new(signal_time: u64) -> Self {
        Self { signal_time }
    }
}

/// Check that a requested green-phase duration is a positive number of
/// seconds.
pub fn validate_signal_time(secs: i64) -> Result<u64> {
    if secs > 0 {
        Ok(secs as u64)
    } else {
        Err(JunctionError::InvalidSignalTime(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_signal_time() {
        let config = CycleConfig::default();
        assert_eq!(config.signal_time, DEFAULT_SIGNAL_TIME);
    }

    #[test]
    fn test_new() {
        let config = CycleConfig::new(5);
        assert_eq!(config.signal_time, 5);
    }

    #[test]
    fn test_validate_accepts_positive() {
        assert_eq!(validate_signal_time(1).unwrap(), 1);
        assert_eq!(validate_signal_time(60).unwrap(), 60);
    }

    #[test]
    fn test_validate_rejects_zero_and_negative() {
        assert!(matches!(
            validate_signal_time(0),
            Err(JunctionError::InvalidSignalTime(0))
        ));
        assert!(matches!(
            validate_signal_time(-5),
            Err(JunctionError::InvalidSignalTime(-5))
        ));
    }
}
