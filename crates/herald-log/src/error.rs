//! Error types for facade and backend construction.

use thiserror::Error;

/// Result alias for facade operations.
pub type FacadeResult<T> = Result<T, FacadeError>;

/// Errors raised while configuring or constructing the logging backend.
#[derive(Debug, Error)]
pub enum FacadeError {
    /// The backend builder was finished without a sink registered.
    #[error("logging backend has no sink registered")]
    MissingSink,
    /// A configuration setting could not be parsed.
    #[error("invalid logging setting")]
    InvalidSetting {
        /// Name of the setting (environment variable or key).
        name: &'static str,
        /// Offending value.
        value: String,
    },
    /// The process-wide facade was already created.
    #[error("global log facade already initialized")]
    AlreadyInitialized,
    /// The backend was requested from the thread that is still constructing it.
    #[error("logging backend is still being constructed on this thread")]
    ConstructionInProgress,
}
