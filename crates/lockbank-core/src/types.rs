use crate::{
    Result,
    constants::{ALL_LOCKS_ADDRESS, MAX_DOOR, MIN_DOOR, SINGLE_BOARD_ADDRESS},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Controller board address on the bus.
///
/// Any byte is accepted. Single-board installs use [`BoardAddress::SINGLE_BOARD`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardAddress(u8);

impl BoardAddress {
    /// Address of the only board in a single-board install.
    pub const SINGLE_BOARD: Self = Self(SINGLE_BOARD_ADDRESS);

    #[must_use]
    pub const fn new(address: u8) -> Self {
        Self(address)
    }

    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }
}

impl Default for BoardAddress {
    fn default() -> Self {
        Self::SINGLE_BOARD
    }
}

impl fmt::Display for BoardAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#04X}", self.0)
    }
}

/// Lock address byte as placed in a frame.
///
/// The protocol does not range-check lock addresses, and neither does this
/// type: values outside 1-24 pass through to the wire unchanged. Use
/// [`DoorNumber`] where a real door is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockAddress(u8);

impl LockAddress {
    /// Address used by the "all doors" commands.
    pub const ALL: Self = Self(ALL_LOCKS_ADDRESS);

    #[must_use]
    pub const fn new(address: u8) -> Self {
        Self(address)
    }

    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    /// Whether this address names a physical door (1-24).
    #[must_use]
    pub fn is_door(&self) -> bool {
        (MIN_DOOR..=MAX_DOOR).contains(&self.0)
    }
}

impl From<DoorNumber> for LockAddress {
    fn from(door: DoorNumber) -> Self {
        Self(door.as_u8())
    }
}

impl fmt::Display for LockAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Door number on a 24-door board (1-24).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DoorNumber(u8);

impl DoorNumber {
    /// Create a new door number with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidDoorNumber` if the number is outside 1-24.
    pub fn new(door: u8) -> Result<Self> {
        if !(MIN_DOOR..=MAX_DOOR).contains(&door) {
            return Err(Error::InvalidDoorNumber(u32::from(door)));
        }
        Ok(Self(door))
    }

    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    /// Iterate over every door on a board, in ascending order.
    pub fn all() -> impl Iterator<Item = DoorNumber> {
        (MIN_DOOR..=MAX_DOOR).map(DoorNumber)
    }
}

impl TryFrom<u8> for DoorNumber {
    type Error = Error;

    fn try_from(door: u8) -> Result<Self> {
        Self::new(door)
    }
}

impl From<DoorNumber> for u8 {
    fn from(door: DoorNumber) -> Self {
        door.0
    }
}

impl fmt::Display for DoorNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DoorNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let door: u32 = s
            .trim()
            .parse()
            .map_err(|_| Error::malformed(format!("Invalid door number: {s}")))?;
        let door = u8::try_from(door).map_err(|_| Error::InvalidDoorNumber(door))?;
        DoorNumber::new(door)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", 1)]
    #[case("05", 5)]
    #[case(" 24 ", 24)]
    fn test_door_number_valid(#[case] input: &str, #[case] expected: u8) {
        let door: DoorNumber = input.parse().unwrap();
        assert_eq!(door.as_u8(), expected);
    }

    #[rstest]
    #[case("0")]
    #[case("25")]
    #[case("300")]
    #[case("abc")]
    fn test_door_number_invalid(#[case] input: &str) {
        assert!(input.parse::<DoorNumber>().is_err());
    }

    #[test]
    fn test_door_number_out_of_range_reports_value() {
        assert_eq!(DoorNumber::new(25), Err(Error::InvalidDoorNumber(25)));
        assert_eq!(
            "300".parse::<DoorNumber>(),
            Err(Error::InvalidDoorNumber(300))
        );
    }

    #[test]
    fn test_all_doors() {
        let doors: Vec<u8> = DoorNumber::all().map(|d| d.as_u8()).collect();
        assert_eq!(doors.len(), 24);
        assert_eq!(doors.first(), Some(&1));
        assert_eq!(doors.last(), Some(&24));
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(24, true)]
    #[case(25, false)]
    #[case(0xFF, false)]
    fn test_lock_address_is_door(#[case] raw: u8, #[case] expected: bool) {
        assert_eq!(LockAddress::new(raw).is_door(), expected);
    }

    #[test]
    fn test_board_address_default_is_single_board() {
        assert_eq!(BoardAddress::default().as_u8(), 0x01);
        assert_eq!(BoardAddress::default().to_string(), "0x01");
    }

    #[test]
    fn test_door_number_serde() {
        let door = DoorNumber::new(7).unwrap();
        assert_eq!(serde_json::to_string(&door).unwrap(), "7");
        assert!(serde_json::from_str::<DoorNumber>("30").is_err());
    }
}
