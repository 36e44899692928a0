//! XOR8 checksum used by command frames and replies.
//!
//! The command checksum folds the four frame fields in a fixed order that
//! differs from their position on the wire:
//!
//! ```text
//! checksum = header ^ board_address ^ function_code ^ lock_address
//! ```
//!
//! XOR is order-independent, so the result equals the positional fold of
//! bytes 0-3, but the field order above is the one the controller documents
//! and the one [`compute_checksum`] takes its arguments in.
//!
//! Replies carry a trailing checksum over every preceding byte, which
//! [`xor8`] computes.
//!
//! # Examples
//!
//! ```
//! use lockbank_protocol::checksum::{compute_checksum, xor8};
//!
//! assert_eq!(compute_checksum(0x8A, 0x01, 0x11, 0x05), 0x9F);
//! assert_eq!(xor8(&[0x80, 0x01, 0x01, 0x01, 0x01, 0x33]), 0xB3);
//! ```

/// Compute the command checksum from its four fields.
///
/// Note the argument order: `function_code` comes before `lock_address`.
#[must_use]
pub const fn compute_checksum(
    header: u8,
    board_address: u8,
    function_code: u8,
    lock_address: u8,
) -> u8 {
    header ^ board_address ^ function_code ^ lock_address
}

/// XOR every byte of `bytes` together. An empty slice yields `0`.
#[must_use]
pub fn xor8(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, b| acc ^ b)
}
