//! Error types for scheduler configuration and control.

/// Result type alias for scheduler operations.
pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Errors surfaced by the scheduler's control surface.
///
/// Runtime conditions (contention, start failures, external disconnects)
/// are recovered inside the loop and show up as counters and logs, never
/// as errors; these variants cover misuse of the control surface and
/// invalid configuration only.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// Configuration rejected at `configure` time.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A frequency outside the receiver's legal bands.
    #[error("Invalid frequency: {frequency_hz} Hz is outside the supported bands")]
    InvalidFrequency { frequency_hz: u32 },

    /// `start` called before `configure`.
    #[error("Scheduler is not configured")]
    NotConfigured,

    /// `start` or `configure` called while the loop is running.
    #[error("Scheduler is already running")]
    AlreadyRunning,

    /// A runtime operation that needs the loop, issued while stopped.
    #[error("Scheduler is not running")]
    NotRunning,
}

impl SchedulerError {
    /// Create a new invalid-configuration error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create a new invalid-frequency error.
    pub fn invalid_frequency(frequency_hz: u32) -> Self {
        Self::InvalidFrequency { frequency_hz }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_display() {
        let error = SchedulerError::invalid_config("hop interval shorter than tick");
        assert_eq!(
            error.to_string(),
            "Invalid configuration: hop interval shorter than tick"
        );
    }

    #[test]
    fn test_invalid_frequency_display() {
        let error = SchedulerError::invalid_frequency(100);
        assert!(error.to_string().contains("100 Hz"));
    }
}
