use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // Protocol errors
    #[error("Malformed input: {message}")]
    MalformedInput { message: String },

    #[error("Checksum mismatch: expected {expected:#04X}, got {actual:#04X}")]
    ChecksumMismatch { expected: u8, actual: u8 },

    #[error("Unrecognized command type: {0}")]
    UnrecognizedCommandType(String),

    // Addressing errors
    #[error("Invalid door number: {0} (expected 1-24)")]
    InvalidDoorNumber(u32),
}

impl Error {
    /// Create a new malformed input error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_mismatch_display() {
        let error = Error::ChecksumMismatch {
            expected: 0x9F,
            actual: 0x00,
        };
        assert_eq!(
            error.to_string(),
            "Checksum mismatch: expected 0x9F, got 0x00"
        );
    }

    #[test]
    fn test_malformed_helper() {
        let error = Error::malformed("empty reply");
        assert!(matches!(error, Error::MalformedInput { .. }));
        assert_eq!(error.to_string(), "Malformed input: empty reply");
    }
}
