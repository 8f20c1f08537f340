//! Error types for RTD stream processing.
//!
//! The error taxonomy mirrors the pipeline's propagation policy:
//!
//! - **Malformed frames** (`MalformedFrame`, `ChecksumMismatch`) are absorbed
//!   by the driver: the frame is dropped and the stream continues.
//! - **Out-of-window fields and unparseable samples are not errors at all**;
//!   the field engine skips them silently.
//! - **Transport errors** (`Connection`, `Port`) cross the library boundary
//!   and are surfaced to the caller on the connection's error channel.
//!
//! ```rust
//! use courtside::RtdError;
//!
//! let error = RtdError::connection_failed("port busy");
//! if error.is_retryable() {
//!     println!("worth retrying: {error}");
//! }
//! ```

use std::time::Duration;
use thiserror::Error;

/// Result type alias for RTD operations.
pub type Result<T, E = RtdError> = std::result::Result<T, E>;

/// Main error type for RTD stream processing.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RtdError {
    #[error("Failed to connect to console: {reason}")]
    Connection {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Serial port error on {port}")]
    Port {
        port: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Capture file error: {path}")]
    Capture {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed frame: {reason}")]
    MalformedFrame { reason: &'static str },

    #[error("Checksum mismatch: expected {expected:?}, computed {computed:?}")]
    ChecksumMismatch { expected: String, computed: String },

    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: Duration },
}

impl RtdError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            RtdError::Connection { .. } => true,
            RtdError::Port { .. } => true,
            RtdError::Timeout { .. } => true,
            RtdError::Capture { .. } => false,
            RtdError::MalformedFrame { .. } => false,
            RtdError::ChecksumMismatch { .. } => false,
        }
    }

    /// Whether this error originated in frame decoding rather than transport.
    ///
    /// Decode errors never halt the pipeline; the offending frame is dropped.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            RtdError::MalformedFrame { .. } | RtdError::ChecksumMismatch { .. }
        )
    }

    /// Helper constructor for connection errors.
    pub fn connection_failed(reason: impl Into<String>) -> Self {
        RtdError::Connection { reason: reason.into(), source: None }
    }

    /// Helper constructor for connection errors with source.
    pub fn connection_failed_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        RtdError::Connection { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for serial port errors.
    pub fn port_error(port: impl Into<String>, source: std::io::Error) -> Self {
        RtdError::Port { port: port.into(), source }
    }

    /// Helper constructor for malformed-frame errors.
    pub fn malformed(reason: &'static str) -> Self {
        RtdError::MalformedFrame { reason }
    }
}
