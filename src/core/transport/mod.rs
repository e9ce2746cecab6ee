//! Serial line transport
//!
//! The pipeline needs exactly one thing from the serial layer: "read one
//! line, or time out". That contract is the [`LineSource`] trait, which
//! lets tests drive the reader without hardware; [`SerialLineSource`] is
//! the `serialport`-backed implementation.

mod serial;

pub use serial::{SerialConfig, SerialLineSource};

use thiserror::Error;

/// Transport error types.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Port not found
    #[error("port not found: {0}")]
    PortNotFound(String),

    /// Permission denied opening the port
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Connection failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Device disconnected
    #[error("disconnected")]
    Disconnected,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Blocking, timeout-bounded source of text lines.
#[cfg_attr(test, mockall::automock)]
pub trait LineSource: Send {
    /// Reads one line, stripped of its terminator.
    ///
    /// `Ok(None)` means the timeout elapsed without a complete line; a
    /// non-ASCII line is also reported this way after being dropped.
    /// `Err` is a fatal fault on the underlying device.
    fn read_line(&mut self) -> Result<Option<String>, TransportError>;
}
