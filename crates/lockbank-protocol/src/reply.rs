//! Typed views over raw controller replies.
//!
//! Replies are not re-framed by the controller: an individual reply mirrors
//! the command layout with the status in the function-code slot, and the
//! "query all" reply widens the middle to three status bytes.
//!
//! ```text
//! individual: [HEADER, BOARD, LOCK, STATUS, CHECKSUM]
//! query all:  [HEADER, BOARD, G17-24, G9-16, G1-8, FUNCTION, CHECKSUM]
//! ```
//!
//! The trailing checksum is the XOR8 of every preceding byte. Parsing does
//! not reject a bad checksum; [`IndividualReply::checksum_ok`] and
//! [`QueryAllReply::checksum_ok`] report it so the caller can decide.

use crate::{checksum::xor8, decoder::DoorBank, decoder::DoorState, decoder::UnlockOutcome};
use lockbank_core::{
    BoardAddress, Error, LockAddress, Result,
    constants::{INDIVIDUAL_REPLY_LENGTH, QUERY_ALL_REPLY_LENGTH},
};

/// Five-byte reply to an individual unlock or query, or to "unlock all".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndividualReply([u8; INDIVIDUAL_REPLY_LENGTH]);

impl IndividualReply {
    /// # Errors
    /// Returns `Error::MalformedInput` unless `bytes` is exactly five bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        bytes.try_into().map(Self).map_err(|_| {
            Error::malformed(format!(
                "Individual reply must be {INDIVIDUAL_REPLY_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })
    }

    pub fn header(&self) -> u8 {
        self.0[0]
    }

    pub fn board_address(&self) -> BoardAddress {
        BoardAddress::new(self.0[1])
    }

    pub fn lock_address(&self) -> LockAddress {
        LockAddress::new(self.0[2])
    }

    pub fn status(&self) -> u8 {
        self.0[3]
    }

    pub fn checksum(&self) -> u8 {
        self.0[4]
    }

    pub fn checksum_ok(&self) -> bool {
        xor8(&self.0[..4]) == self.checksum()
    }

    /// Read the status as the answer to a status query.
    ///
    /// # Errors
    /// Returns `Error::MalformedInput` for an unknown status code.
    pub fn door_state(&self) -> Result<DoorState> {
        DoorState::from_status(self.status())
    }

    /// Read the status as the answer to an individual unlock.
    ///
    /// # Errors
    /// Returns `Error::MalformedInput` for an unknown status code.
    pub fn unlock_outcome(&self) -> Result<UnlockOutcome> {
        UnlockOutcome::from_status(self.status())
    }
}

/// Seven-byte reply to "query all".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryAllReply([u8; QUERY_ALL_REPLY_LENGTH]);

impl QueryAllReply {
    /// # Errors
    /// Returns `Error::MalformedInput` unless `bytes` is exactly seven bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        bytes.try_into().map(Self).map_err(|_| {
            Error::malformed(format!(
                "Query-all reply must be {QUERY_ALL_REPLY_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })
    }

    pub fn header(&self) -> u8 {
        self.0[0]
    }

    pub fn board_address(&self) -> BoardAddress {
        BoardAddress::new(self.0[1])
    }

    pub fn function_code(&self) -> u8 {
        self.0[5]
    }

    pub fn checksum(&self) -> u8 {
        self.0[6]
    }

    pub fn checksum_ok(&self) -> bool {
        xor8(&self.0[..6]) == self.checksum()
    }

    /// The three group status bytes, in reply order (17-24, 9-16, 1-8).
    pub fn group_status(&self) -> [u8; 3] {
        [self.0[2], self.0[3], self.0[4]]
    }

    pub fn door_bank(&self) -> DoorBank {
        DoorBank::from_groups(self.group_status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockbank_core::DoorNumber;

    #[test]
    fn test_individual_query_reply() {
        let reply = IndividualReply::parse(&[0x80, 0x01, 0x05, 0x11, 0x95]).unwrap();
        assert_eq!(reply.lock_address(), LockAddress::new(5));
        assert_eq!(reply.board_address(), BoardAddress::SINGLE_BOARD);
        assert!(reply.checksum_ok());
        assert_eq!(reply.door_state().unwrap(), DoorState::Locked);
    }

    #[test]
    fn test_individual_unlock_reply_uses_closed_as_failure() {
        let failed = IndividualReply::parse(&[0x8A, 0x01, 0x05, 0x11, 0x9F]).unwrap();
        assert_eq!(failed.unlock_outcome().unwrap(), UnlockOutcome::Failed);

        let opened = IndividualReply::parse(&[0x8A, 0x01, 0x05, 0x00, 0x8E]).unwrap();
        assert_eq!(opened.unlock_outcome().unwrap(), UnlockOutcome::Unlocked);
        assert!(opened.checksum_ok());
    }

    #[test]
    fn test_individual_reply_bad_checksum_still_parses() {
        let reply = IndividualReply::parse(&[0x8A, 0x01, 0x0B, 0x00, 0x81]).unwrap();
        assert!(!reply.checksum_ok());
    }

    #[test]
    fn test_individual_reply_wrong_length() {
        assert!(IndividualReply::parse(&[0x8A, 0x01, 0x05]).is_err());
        assert!(IndividualReply::parse(&[0; 7]).is_err());
    }

    #[test]
    fn test_query_all_reply() {
        let reply = QueryAllReply::parse(&[0x80, 0x01, 0x01, 0x01, 0x01, 0x33, 0xB3]).unwrap();
        assert!(reply.checksum_ok());
        assert_eq!(reply.function_code(), 0x33);
        assert_eq!(reply.group_status(), [0x01, 0x01, 0x01]);

        let bank = reply.door_bank();
        assert_eq!(bank.state(DoorNumber::new(9).unwrap()), DoorState::Locked);
        assert_eq!(bank.state(DoorNumber::new(2).unwrap()), DoorState::Open);
    }

    #[test]
    fn test_query_all_reply_wrong_length() {
        assert!(matches!(
            QueryAllReply::parse(&[0x80, 0x01, 0x00, 0x33, 0xB2]),
            Err(Error::MalformedInput { .. })
        ));
    }
}
