//! Command types understood by the locker controller board.
//!
//! | Type | Code | Header | Function | Lock | Reply | Timeout |
//! |------|------|--------|----------|------|-------|---------|
//! | [`UnlockAll`](CommandType::UnlockAll) | `UA` | `0x8A` | `0x11` | `0x00` | 5 bytes | 10 s |
//! | [`UnlockIndividual`](CommandType::UnlockIndividual) | `UI` | `0x8A` | `0x11` | door | 5 bytes | 750 ms |
//! | [`QueryIndividual`](CommandType::QueryIndividual) | `QI` | `0x80` | `0x33` | door | 5 bytes | 750 ms |
//! | [`QueryAll`](CommandType::QueryAll) | `QA` | `0x80` | `0x33` | `0x00` | 7 bytes | 750 ms |

use lockbank_core::{
    Error, Result,
    constants::{
        DEFAULT_READ_TIMEOUT_MS, INDIVIDUAL_REPLY_LENGTH, QUERY_ALL_REPLY_LENGTH, QUERY_FUNCTION,
        QUERY_HEADER, UNLOCK_ALL_TIMEOUT_MS, UNLOCK_FUNCTION, UNLOCK_HEADER,
    },
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Kind of command sent to the board.
///
/// The command type alone decides the reply length the transport waits for
/// and how long it waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandType {
    /// Open every door in sequence.
    UnlockAll,
    /// Open one door.
    UnlockIndividual,
    /// Read the state of one door.
    QueryIndividual,
    /// Read the state of every door.
    QueryAll,
}

impl CommandType {
    /// All command types, in wire-code order.
    pub const ALL: [CommandType; 4] = [
        CommandType::UnlockAll,
        CommandType::UnlockIndividual,
        CommandType::QueryIndividual,
        CommandType::QueryAll,
    ];

    /// Two-letter code used by operators and logs.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnlockAll => "UA",
            Self::UnlockIndividual => "UI",
            Self::QueryIndividual => "QI",
            Self::QueryAll => "QA",
        }
    }

    /// Header byte of frames of this type.
    #[must_use]
    pub const fn header(&self) -> u8 {
        match self {
            Self::UnlockAll | Self::UnlockIndividual => UNLOCK_HEADER,
            Self::QueryIndividual | Self::QueryAll => QUERY_HEADER,
        }
    }

    /// Function code of frames of this type.
    #[must_use]
    pub const fn function_code(&self) -> u8 {
        match self {
            Self::UnlockAll | Self::UnlockIndividual => UNLOCK_FUNCTION,
            Self::QueryIndividual | Self::QueryAll => QUERY_FUNCTION,
        }
    }

    /// Number of reply bytes the board sends back.
    #[must_use]
    pub const fn reply_len(&self) -> usize {
        match self {
            Self::QueryAll => QUERY_ALL_REPLY_LENGTH,
            Self::UnlockAll | Self::UnlockIndividual | Self::QueryIndividual => {
                INDIVIDUAL_REPLY_LENGTH
            }
        }
    }

    /// How long to wait for the reply.
    #[must_use]
    pub const fn read_timeout(&self) -> Duration {
        match self {
            Self::UnlockAll => Duration::from_millis(UNLOCK_ALL_TIMEOUT_MS),
            _ => Duration::from_millis(DEFAULT_READ_TIMEOUT_MS),
        }
    }

    /// Whether the command addresses every door rather than one.
    #[must_use]
    pub const fn targets_all(&self) -> bool {
        matches!(self, Self::UnlockAll | Self::QueryAll)
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CommandType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UA" => Ok(Self::UnlockAll),
            "UI" => Ok(Self::UnlockIndividual),
            "QI" => Ok(Self::QueryIndividual),
            "QA" => Ok(Self::QueryAll),
            _ => Err(Error::UnrecognizedCommandType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(CommandType::UnlockAll, 5, 10_000)]
    #[case(CommandType::UnlockIndividual, 5, 750)]
    #[case(CommandType::QueryIndividual, 5, 750)]
    #[case(CommandType::QueryAll, 7, 750)]
    fn test_reply_shape(
        #[case] command: CommandType,
        #[case] reply_len: usize,
        #[case] timeout_ms: u64,
    ) {
        assert_eq!(command.reply_len(), reply_len);
        assert_eq!(command.read_timeout(), Duration::from_millis(timeout_ms));
    }

    #[test]
    fn test_code_roundtrip() {
        for command in CommandType::ALL {
            assert_eq!(command.code().parse::<CommandType>().unwrap(), command);
        }
    }

    #[rstest]
    #[case("ua", CommandType::UnlockAll)]
    #[case(" qa ", CommandType::QueryAll)]
    fn test_code_is_case_insensitive(#[case] input: &str, #[case] expected: CommandType) {
        assert_eq!(input.parse::<CommandType>().unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("AU")]
    #[case("UNLOCK")]
    fn test_unrecognized_code(#[case] input: &str) {
        assert_eq!(
            input.parse::<CommandType>(),
            Err(Error::UnrecognizedCommandType(input.to_string()))
        );
    }

    #[test]
    fn test_headers_and_functions() {
        assert_eq!(CommandType::UnlockIndividual.header(), 0x8A);
        assert_eq!(CommandType::UnlockIndividual.function_code(), 0x11);
        assert_eq!(CommandType::QueryIndividual.header(), 0x80);
        assert_eq!(CommandType::QueryIndividual.function_code(), 0x33);
        assert!(CommandType::UnlockAll.targets_all());
        assert!(!CommandType::QueryIndividual.targets_all());
    }
}
