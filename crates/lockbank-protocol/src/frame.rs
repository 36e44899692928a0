use crate::{checksum::compute_checksum, commands::CommandType};
use lockbank_core::{
    BoardAddress, Error, LockAddress, Result,
    constants::{FRAME_LENGTH, QUERY_FUNCTION, QUERY_HEADER, UNLOCK_FUNCTION, UNLOCK_HEADER},
};
use std::fmt;

/// CommandFrame is the five-byte wire form of one command.
///
/// # Wire Format
/// ```text
/// 8A 01 05 11 9F
/// ^^ ^^ ^^ ^^ ^^
/// |  |  |  |  checksum
/// |  |  |  function code
/// |  |  lock address
/// |  board address
/// header
/// ```
///
/// A frame can only be constructed with a checksum computed from its other
/// four fields, or parsed from bytes whose checksum verifies. Frames handed
/// to the transport are therefore always accepted by the board's checksum
/// check.
///
/// # Basic Usage
/// ```
/// use lockbank_protocol::CommandFrame;
/// use lockbank_core::{BoardAddress, LockAddress};
///
/// let frame = CommandFrame::unlock(BoardAddress::SINGLE_BOARD, LockAddress::new(5));
/// assert_eq!(frame.as_bytes(), &[0x8A, 0x01, 0x05, 0x11, 0x9F]);
/// assert_eq!(frame.to_string(), "8A 01 05 11 9F");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandFrame([u8; FRAME_LENGTH]);

impl CommandFrame {
    /// Assemble a frame from its fields, computing the checksum.
    #[must_use]
    pub const fn new(header: u8, board_address: u8, lock_address: u8, function_code: u8) -> Self {
        let checksum = compute_checksum(header, board_address, function_code, lock_address);
        Self([header, board_address, lock_address, function_code, checksum])
    }

    /// "Unlock all doors sequentially" (`8A 01 00 11 9A` on board 1).
    #[must_use]
    pub const fn unlock_all(board: BoardAddress) -> Self {
        Self::new(
            UNLOCK_HEADER,
            board.as_u8(),
            LockAddress::ALL.as_u8(),
            UNLOCK_FUNCTION,
        )
    }

    /// "Query all door states" (`80 01 00 33 B2` on board 1).
    ///
    /// The board answers with a seven-byte reply.
    #[must_use]
    pub const fn query_all(board: BoardAddress) -> Self {
        Self::new(
            QUERY_HEADER,
            board.as_u8(),
            LockAddress::ALL.as_u8(),
            QUERY_FUNCTION,
        )
    }

    /// Unlock one door.
    #[must_use]
    pub const fn unlock(board: BoardAddress, lock: LockAddress) -> Self {
        Self::new(UNLOCK_HEADER, board.as_u8(), lock.as_u8(), UNLOCK_FUNCTION)
    }

    /// Query the state of one door.
    #[must_use]
    pub const fn query(board: BoardAddress, lock: LockAddress) -> Self {
        Self::new(QUERY_HEADER, board.as_u8(), lock.as_u8(), QUERY_FUNCTION)
    }

    /// Build the frame for `command`.
    ///
    /// `lock` is ignored by the "all doors" commands, which always address
    /// lock `0x00`.
    #[must_use]
    pub const fn for_command(command: CommandType, board: BoardAddress, lock: LockAddress) -> Self {
        match command {
            CommandType::UnlockAll => Self::unlock_all(board),
            CommandType::QueryAll => Self::query_all(board),
            CommandType::UnlockIndividual => Self::unlock(board, lock),
            CommandType::QueryIndividual => Self::query(board, lock),
        }
    }

    /// Get the raw bytes of the frame.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub const fn header(&self) -> u8 {
        self.0[0]
    }

    pub const fn board_address(&self) -> BoardAddress {
        BoardAddress::new(self.0[1])
    }

    pub const fn lock_address(&self) -> LockAddress {
        LockAddress::new(self.0[2])
    }

    pub const fn function_code(&self) -> u8 {
        self.0[3]
    }

    pub const fn checksum(&self) -> u8 {
        self.0[4]
    }
}

impl AsRef<[u8]> for CommandFrame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<CommandFrame> for [u8; FRAME_LENGTH] {
    fn from(frame: CommandFrame) -> Self {
        frame.0
    }
}

impl TryFrom<&[u8]> for CommandFrame {
    type Error = Error;

    /// Accept an externally supplied frame after checking length and checksum.
    fn try_from(bytes: &[u8]) -> Result<Self> {
        let [header, board, lock, function, checksum]: [u8; FRAME_LENGTH] =
            bytes.try_into().map_err(|_| {
                Error::malformed(format!(
                    "Command frame must be {FRAME_LENGTH} bytes, got {}",
                    bytes.len()
                ))
            })?;

        let frame = Self::new(header, board, lock, function);
        if frame.checksum() != checksum {
            return Err(Error::ChecksumMismatch {
                expected: frame.checksum(),
                actual: checksum,
            });
        }
        Ok(frame)
    }
}

impl fmt::Display for CommandFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_hex(&self.0))
    }
}

/// Build an unlock or query frame from loosely typed fields.
///
/// Each field must fit in a byte; a value outside 0-255 is rejected rather
/// than truncated. The board address is placed in the frame as given.
///
/// # Errors
/// Returns `Error::MalformedInput` naming the first field out of range.
///
/// # Examples
/// ```
/// use lockbank_protocol::build_unlock_or_query_frame;
///
/// let frame = build_unlock_or_query_frame(0x8A, 0x01, 0x05, 0x11).unwrap();
/// assert_eq!(frame.as_bytes(), &[0x8A, 0x01, 0x05, 0x11, 0x9F]);
///
/// assert!(build_unlock_or_query_frame(0x8A, 0x01, 0x100, 0x11).is_err());
/// ```
pub fn build_unlock_or_query_frame<T>(
    header: T,
    board_address: T,
    lock_address: T,
    function_code: T,
) -> Result<CommandFrame>
where
    T: TryInto<u8> + Copy + fmt::Display,
{
    Ok(CommandFrame::new(
        to_byte("header", header)?,
        to_byte("board address", board_address)?,
        to_byte("lock address", lock_address)?,
        to_byte("function code", function_code)?,
    ))
}

fn to_byte<T>(field: &str, value: T) -> Result<u8>
where
    T: TryInto<u8> + Copy + fmt::Display,
{
    value
        .try_into()
        .map_err(|_| Error::malformed(format!("{field} {value} does not fit in a byte")))
}

/// Format bytes as space-separated upper-case hex, e.g. `8A 01 00 11 9A`.
#[must_use]
pub fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
