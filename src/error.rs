//! Error types for msfkit
//!
//! Provides a unified error type for all container operations.

use thiserror::Error;

/// Result type alias using MsfError
pub type Result<T> = std::result::Result<T, MsfError>;

/// Unified error type for MSF operations
#[derive(Debug, Error)]
pub enum MsfError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An I/O primitive failed during a named container operation
    #[error("IO error: {op}: {source}")]
    IoOp {
        op: &'static str,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Format Errors
    // -------------------------------------------------------------------------
    /// The input is not a well-formed MSF container.
    #[error("Invalid MSF container: {0}")]
    InvalidContainer(String),

    // -------------------------------------------------------------------------
    // Container Errors
    // -------------------------------------------------------------------------
    #[error("Stream index {index} out of range (container has {count} streams)")]
    StreamIndex { index: usize, count: usize },

    #[error("Stream {index} is {len} bytes, larger than a container can hold")]
    StreamTooLarge { index: usize, len: u64 },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MsfError {
    /// Shorthand for building an `InvalidContainer` error
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        MsfError::InvalidContainer(msg.into())
    }

    /// Error mapper tagging an `io::Error` with the operation that failed
    pub(crate) fn io_op(op: &'static str) -> impl FnOnce(std::io::Error) -> Self {
        move |source| MsfError::IoOp { op, source }
    }
}
