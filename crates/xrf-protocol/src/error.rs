//! Protocol error types.

use thiserror::Error;

/// Errors that can occur when decoding XRF protocol data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Packet buffer is shorter than the fields implied by its message type.
    #[error("packet too short: expected at least {expected} bytes, got {actual}")]
    Truncated {
        /// Minimum length required by the message type.
        expected: usize,
        /// Actual length received.
        actual: usize,
    },

    /// A UID string could not be parsed as 8 hex-encoded bytes.
    #[error("invalid device uid: {0}")]
    InvalidUid(String),
}
