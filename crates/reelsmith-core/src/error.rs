//! Error types module
//!
//! All failures a generation run can produce are unified under [`AppError`].
//! Only [`AppError::InvalidInput`] and [`AppError::RunInProgress`] ever reach the
//! caller of a run as an `Err`; everything else is reported through the
//! `error` progress status and the run resolves to no result.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like a busy orchestrator
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be presented and logged
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "POLL_TIMEOUT")
    fn error_code(&self) -> &'static str;

    /// Whether starting a fresh run could succeed
    fn is_recoverable(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("A generation run is already in progress")]
    RunInProgress,

    #[error("initial generation returned no result")]
    NoInitialResult,

    #[error("extension for segment {segment} failed or returned no result")]
    ExtensionFailed { segment: u32 },

    #[error("operation {operation} did not finish after {attempts} status checks")]
    PollTimeout { operation: String, attempts: u32 },

    #[error("generation run was cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{message}")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        // `{:#}` keeps the context chain, e.g. "Failed to poll operation: connection refused"
        AppError::InternalWithSource {
            message: format!("{:#}", err),
            source: err,
        }
    }
}

impl ErrorMetadata for AppError {
    fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::RunInProgress => "RUN_IN_PROGRESS",
            AppError::NoInitialResult => "NO_INITIAL_RESULT",
            AppError::ExtensionFailed { .. } => "EXTENSION_FAILED",
            AppError::PollTimeout { .. } => "POLL_TIMEOUT",
            AppError::Cancelled => "CANCELLED",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "INTERNAL_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::RunInProgress
                | AppError::PollTimeout { .. }
                | AppError::InternalWithSource { .. }
        )
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::InvalidInput(_) | AppError::Cancelled => LogLevel::Debug,
            AppError::RunInProgress => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }
}
