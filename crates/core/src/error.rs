// Central Error Type for the Probe

use thiserror::Error;

/// Fallback diagnostic used when the host failure carries no message
pub const GENERIC_FAILURE_MESSAGE: &str = "failed to query device information";

/// Failure to obtain memory statistics or display metrics from the host
///
/// A single, undifferentiated kind: callers only see the diagnostic text,
/// never which capability failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ProbeError {
    message: String,
}

impl ProbeError {
    /// Create an error from a host diagnostic
    ///
    /// Blank diagnostics are replaced by [`GENERIC_FAILURE_MESSAGE`].
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            return Self::generic();
        }
        Self { message }
    }

    /// Error with the generic fallback diagnostic
    pub fn generic() -> Self {
        Self {
            message: GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Error for a host capability that is not present at all
    pub fn unavailable(capability: &str) -> Self {
        Self::new(format!("{capability} capability unavailable"))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<std::io::Error> for ProbeError {
    fn from(err: std::io::Error) -> Self {
        ProbeError::new(err.to_string())
    }
}

impl From<String> for ProbeError {
    fn from(message: String) -> Self {
        ProbeError::new(message)
    }
}

impl From<&str> for ProbeError {
    fn from(message: &str) -> Self {
        ProbeError::new(message)
    }
}

/// Result type alias using ProbeError
pub type Result<T> = std::result::Result<T, ProbeError>;
