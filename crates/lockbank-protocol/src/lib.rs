//! Wire protocol for the locker controller board.
//!
//! Commands are fixed five-byte frames protected by an XOR8 checksum. This
//! crate builds those frames, names the command types and their reply
//! shapes, and decodes replies into door states. It performs no I/O; see
//! `lockbank-hardware` for the bus transport.
//!
//! ```
//! use lockbank_core::{BoardAddress, LockAddress};
//! use lockbank_protocol::{CommandFrame, CommandType, decode_door_states};
//!
//! let frame = CommandFrame::for_command(
//!     CommandType::QueryAll,
//!     BoardAddress::SINGLE_BOARD,
//!     LockAddress::ALL,
//! );
//! assert_eq!(frame.to_string(), "80 01 00 33 B2");
//! assert_eq!(CommandType::QueryAll.reply_len(), 7);
//!
//! let states = decode_door_states(&[0x80, 0x01, 0x00, 0x00, 0x03, 0x33, 0xB1]).unwrap();
//! assert_eq!(states[2].to_string(), "00000011");
//! ```

pub mod checksum;
pub mod commands;
pub mod decoder;
pub mod frame;
pub mod reply;

pub use checksum::{compute_checksum, xor8};
pub use commands::CommandType;
pub use decoder::{DoorBank, DoorGroup, DoorState, StatusBits, UnlockOutcome, decode_door_states};
pub use frame::{CommandFrame, build_unlock_or_query_frame, to_hex};
pub use reply::{IndividualReply, QueryAllReply};
