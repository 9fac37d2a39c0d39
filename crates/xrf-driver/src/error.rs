//! Driver error types.

use thiserror::Error;

/// Errors surfaced by the driver.
///
/// Framing, codec, and transient link errors never appear here: they are
/// contained inside the pump and dispatch loops. What remains is startup
/// failure (the only fatal condition) and lookups of unknown fixtures.
#[derive(Error, Debug)]
pub enum DriverError {
    /// No serial port matching the dongle's USB identifiers was found.
    #[error("no XRF dongle detected on any serial port")]
    NoDongle,

    /// The serial port could not be enumerated or opened.
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// I/O error on the serial link.
    #[error("serial I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested fixture has never been heard from.
    #[error("device not found: {0}")]
    DeviceNotFound(String),
}
