//! Error types for bus dispatch.
//!
//! Every failure of a command exchange is reported as a [`DispatchError`].
//! None of them is fatal: the bus is released and the caller decides whether
//! to retry.

/// Result type alias for bus operations.
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Errors that can occur while exchanging a command with the board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The port could not be opened, configured or written.
    ///
    /// Typically an unplugged cable, a missing USB-RS485 adapter or a port
    /// held by another process.
    #[error("Transport unavailable on {port}: {message}")]
    TransportUnavailable { port: String, message: String },

    /// The full reply did not arrive within the command's read window.
    #[error("Timeout after {timeout_ms}ms: expected {expected} bytes, received {received}")]
    Timeout {
        expected: usize,
        received: usize,
        timeout_ms: u64,
    },

    /// A frame or reply did not have the expected shape.
    #[error("Malformed input: {message}")]
    MalformedInput { message: String },

    /// Dispatch was requested for a command code that does not exist.
    #[error("Unrecognized command type: {0}")]
    UnrecognizedCommandType(String),
}

impl DispatchError {
    /// Create a new transport unavailable error.
    pub fn transport(port: impl Into<String>, source: impl std::fmt::Display) -> Self {
        Self::TransportUnavailable {
            port: port.into(),
            message: source.to_string(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout(expected: usize, received: usize, timeout_ms: u64) -> Self {
        Self::Timeout {
            expected,
            received,
            timeout_ms,
        }
    }

    /// Create a new malformed input error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: message.into(),
        }
    }

    /// Whether the board stayed silent, as opposed to a local fault.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl From<lockbank_core::Error> for DispatchError {
    fn from(error: lockbank_core::Error) -> Self {
        match error {
            lockbank_core::Error::UnrecognizedCommandType(code) => {
                Self::UnrecognizedCommandType(code)
            }
            lockbank_core::Error::MalformedInput { message } => Self::MalformedInput { message },
            other => Self::malformed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error() {
        let error = DispatchError::transport("/dev/ttyUSB0", "No such file or directory");
        assert!(matches!(error, DispatchError::TransportUnavailable { .. }));
        assert_eq!(
            error.to_string(),
            "Transport unavailable on /dev/ttyUSB0: No such file or directory"
        );
    }

    #[test]
    fn test_timeout_error() {
        let error = DispatchError::timeout(7, 0, 750);
        assert!(error.is_timeout());
        assert_eq!(
            error.to_string(),
            "Timeout after 750ms: expected 7 bytes, received 0"
        );
    }

    #[test]
    fn test_from_core_error() {
        let error: DispatchError = lockbank_core::Error::UnrecognizedCommandType("XX".into()).into();
        assert_eq!(error, DispatchError::UnrecognizedCommandType("XX".into()));

        let error: DispatchError = lockbank_core::Error::malformed("empty reply").into();
        assert_eq!(error, DispatchError::malformed("empty reply"));

        let error: DispatchError = lockbank_core::Error::ChecksumMismatch {
            expected: 0x9F,
            actual: 0x00,
        }
        .into();
        assert_eq!(
            error.to_string(),
            "Malformed input: Checksum mismatch: expected 0x9F, got 0x00"
        );
    }
}
