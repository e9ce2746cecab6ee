//! Serial port line source

use super::{LineSource, TransportError};
use serde::{Deserialize, Serialize};
use serialport::SerialPort;
use std::io::Read;
use std::time::Duration;

/// Serial port configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Port name (e.g. `/dev/ttyACM0`, `COM3`).
    pub port: String,
    /// Baud rate.
    pub baud_rate: u32,
    /// Read timeout in seconds.
    pub timeout_secs: u64,
}

impl SerialConfig {
    /// Create a new serial configuration with the default read timeout.
    pub fn new(port: &str, baud_rate: u32) -> Self {
        Self {
            port: port.to_string(),
            baud_rate,
            timeout_secs: 5,
        }
    }

    /// Set the read timeout.
    #[must_use]
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self::new("/dev/ttyACM0", 9600)
    }
}

/// Line source over a serial device (8N1, no flow control).
///
/// The port handle is released by drop on every exit path. A partial line
/// interrupted by a timeout is kept and completed on the next read.
pub struct SerialLineSource {
    port: Box<dyn SerialPort>,
    pending: Vec<u8>,
}

impl SerialLineSource {
    /// Opens the configured port.
    pub fn open(config: &SerialConfig) -> Result<Self, TransportError> {
        let port = serialport::new(&config.port, config.baud_rate)
            .timeout(Duration::from_secs(config.timeout_secs))
            .open()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::NoDevice => {
                    TransportError::PortNotFound(config.port.clone())
                }
                serialport::ErrorKind::Io(std::io::ErrorKind::PermissionDenied) => {
                    TransportError::PermissionDenied(config.port.clone())
                }
                _ => TransportError::ConnectionFailed(e.to_string()),
            })?;

        Ok(Self {
            port,
            pending: Vec::new(),
        })
    }
}

impl LineSource for SerialLineSource {
    fn read_line(&mut self) -> Result<Option<String>, TransportError> {
        let mut byte = [0u8; 1];
        loop {
            match self.port.read(&mut byte) {
                Ok(0) => return Err(TransportError::Disconnected),
                Ok(_) => {
                    if byte[0] == b'\n' {
                        let raw = std::mem::take(&mut self.pending);
                        let line = match String::from_utf8(raw) {
                            Ok(line) if line.is_ascii() => line,
                            _ => {
                                tracing::debug!("dropping non-ASCII line");
                                return Ok(None);
                            }
                        };
                        return Ok(Some(line.trim_end_matches('\r').to_string()));
                    }
                    self.pending.push(byte[0]);
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::TimedOut => return Ok(None),
                Err(e) => return Err(TransportError::Io(e)),
            }
        }
    }
}
