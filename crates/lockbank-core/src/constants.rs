//! Core constants for the locker bus protocol.
//!
//! Every command on the bus is a fixed five-byte frame:
//!
//! ```text
//! [HEADER, BOARD, LOCK, FUNCTION, CHECKSUM]
//! ```
//!
//! | Offset | Field | Values |
//! |--------|-------|--------|
//! | 0 | header | [`UNLOCK_HEADER`] or [`QUERY_HEADER`] |
//! | 1 | board address | [`SINGLE_BOARD_ADDRESS`] on single-board installs |
//! | 2 | lock address | 1-24, or [`ALL_LOCKS_ADDRESS`] |
//! | 3 | function code | [`UNLOCK_FUNCTION`], [`QUERY_FUNCTION`] |
//! | 4 | checksum | XOR8 of header, board, function, lock |
//!
//! Replies are five bytes, except the "query all" reply which is seven:
//!
//! ```text
//! [HEADER, BOARD, G17-24, G9-16, G1-8, FUNCTION, CHECKSUM]
//! ```
//!
//! # Usage
//!
//! ```
//! use lockbank_core::constants::*;
//! use std::time::Duration;
//!
//! assert_eq!(FRAME_LENGTH, 5);
//! let window = Duration::from_millis(UNLOCK_ALL_TIMEOUT_MS);
//! assert_eq!(window.as_secs(), 10);
//! ```

// ============================================================================
// Frame Headers
// ============================================================================

/// Header byte for unlock-class commands (individual and all doors).
pub const UNLOCK_HEADER: u8 = 0x8A;

/// Header byte for query-class commands (individual and all doors).
pub const QUERY_HEADER: u8 = 0x80;

// ============================================================================
// Function Codes
// ============================================================================

/// Function code for unlock commands.
///
/// Also returned in status replies to mean "closed". After an individual
/// unlock, a closed status means the unlock attempt failed.
pub const UNLOCK_FUNCTION: u8 = 0x11;

/// Function code for status queries.
pub const QUERY_FUNCTION: u8 = 0x33;

/// Status code reported for a closed (locked) door.
pub const CLOSED_STATUS: u8 = 0x11;

/// Status code reported for an open door.
pub const OPEN_STATUS: u8 = 0x00;

// ============================================================================
// Addressing
// ============================================================================

/// Board address of the only controller board in a single-board install.
///
/// Deployments with more than one board on the bus must pass their own
/// address; nothing in the protocol layer assumes this value.
pub const SINGLE_BOARD_ADDRESS: u8 = 0x01;

/// Lock address used by "all doors" commands.
pub const ALL_LOCKS_ADDRESS: u8 = 0x00;

/// Lowest door number on a board.
pub const MIN_DOOR: u8 = 1;

/// Highest door number on a board.
pub const MAX_DOOR: u8 = 24;

/// Doors reported per status byte.
pub const DOORS_PER_GROUP: u8 = 8;

/// Status bytes in a "query all" reply.
pub const DOOR_GROUP_COUNT: usize = 3;

// ============================================================================
// Frame Geometry
// ============================================================================

/// Length of every command frame and of individual replies.
pub const FRAME_LENGTH: usize = 5;

/// Length of a reply to an individual unlock or query, and to "unlock all".
pub const INDIVIDUAL_REPLY_LENGTH: usize = 5;

/// Length of a reply to "query all".
pub const QUERY_ALL_REPLY_LENGTH: usize = 7;

/// Offset of the first door-group status byte in a "query all" reply.
///
/// Groups follow in the order doors 17-24, 9-16, 1-8.
pub const QUERY_ALL_GROUP_OFFSET: usize = 2;

/// Offset of the status byte in an individual reply.
pub const INDIVIDUAL_STATUS_OFFSET: usize = 3;

// ============================================================================
// Serial Line
// ============================================================================

/// Bus baud rate. The controller boards do not negotiate.
pub const BAUD_RATE: u32 = 9600;

/// Default read timeout (milliseconds) for every command but "unlock all".
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 750;

/// Read timeout (milliseconds) for "unlock all".
///
/// The board actuates every door in sequence before it replies.
pub const UNLOCK_ALL_TIMEOUT_MS: u64 = 10_000;
