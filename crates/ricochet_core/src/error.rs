use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors surfaced by the simulation core.
///
/// Every variant is recoverable: a rejected command leaves the world untouched.
#[derive(Debug, Error)]
pub enum SimError {
    /// Non-finite or structurally invalid construction input.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to parse config: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The scheduler's driver thread has already quiesced.
    #[error("scheduler is stopped")]
    SchedulerStopped,

    #[error("scheduler driver thread panicked")]
    DriverPanicked,
}

impl SimError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }
}

/// Reject NaN and infinities for a named input.
pub(crate) fn ensure_finite(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SimError::invalid(format!("{name} must be finite, got {value}")))
    }
}
