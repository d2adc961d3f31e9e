//! # Design
//!
//! - Centralize demo errors for bootstrap and worker orchestration.
//! - Keep error messages constant while carrying context fields for debugging.

use thiserror::Error;

/// Result alias for demo operations.
pub type DemoResult<T> = Result<T, DemoError>;

/// Demo-level error type.
#[derive(Debug, Error)]
pub enum DemoError {
    /// Logging setup failed.
    #[error("logging operation failed")]
    Logging {
        /// Operation identifier.
        operation: &'static str,
        /// Source facade error.
        source: herald_log::FacadeError,
    },
    /// A worker payload could not be serialized.
    #[error("worker report serialization failed")]
    Report {
        /// Worker identifier.
        worker: usize,
        /// Source serializer error.
        source: serde_json::Error,
    },
    /// A worker task panicked or was cancelled.
    #[error("worker task did not complete")]
    Join {
        /// Source join error.
        source: tokio::task::JoinError,
    },
}
