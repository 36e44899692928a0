//! Door-state decoding for controller replies.
//!
//! Door states travel as status bytes, one bit per door: `1` means the door
//! is closed (locked), `0` means it is open. Within a group of eight doors,
//! bit `0x01` is the lowest-numbered door and bit `0x80` the highest.
//!
//! A "query all" reply carries three such bytes at offsets 2-4, in the order
//! doors 17-24, 9-16, 1-8:
//!
//! ```text
//! 80 01 [01 01 01] 33 B3
//!        |  |  |
//!        |  |  doors 1-8   -> door 1 closed
//!        |  doors 9-16     -> door 9 closed
//!        doors 17-24       -> door 17 closed
//! ```
//!
//! The protocol reuses the "closed" status code after an individual unlock to
//! mean the unlock failed. [`DoorState`] and [`UnlockOutcome`] keep the two
//! meanings apart; which one applies depends on the command that produced
//! the reply.

use lockbank_core::{
    DoorNumber, Error, Result,
    constants::{
        CLOSED_STATUS, DOOR_GROUP_COUNT, DOORS_PER_GROUP, OPEN_STATUS, QUERY_ALL_GROUP_OFFSET,
        QUERY_ALL_REPLY_LENGTH,
    },
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One status byte, rendered most-significant bit first.
///
/// ```
/// use lockbank_protocol::decoder::StatusBits;
///
/// assert_eq!(StatusBits::new(0x05).to_string(), "00000101");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusBits(u8);

impl StatusBits {
    #[must_use]
    pub const fn new(bits: u8) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    /// Whether bit `index` (0 = least significant) is set.
    #[must_use]
    pub const fn is_set(&self, index: u8) -> bool {
        index < 8 && self.0 & (1 << index) != 0
    }
}

impl fmt::Display for StatusBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08b}", self.0)
    }
}

/// Decode a reply into status bytes.
///
/// A seven-byte reply is treated as a "query all" reply and yields its three
/// door-group bytes (doors 17-24, 9-16, 1-8). Any other non-empty reply is
/// returned byte for byte.
///
/// # Errors
/// Returns `Error::MalformedInput` for an empty reply. An empty reply means
/// the board sent nothing, so it is reported rather than decoded as an empty
/// list of groups.
///
/// # Examples
/// ```
/// use lockbank_protocol::decode_door_states;
///
/// let reply = [0x80, 0x01, 0x01, 0x01, 0x01, 0x33, 0xB3];
/// let groups: Vec<String> = decode_door_states(&reply)
///     .unwrap()
///     .iter()
///     .map(ToString::to_string)
///     .collect();
/// assert_eq!(groups, ["00000001", "00000001", "00000001"]);
/// ```
pub fn decode_door_states(response: &[u8]) -> Result<Vec<StatusBits>> {
    if response.is_empty() {
        return Err(Error::malformed("Cannot decode door states from an empty reply"));
    }

    let groups = if response.len() == QUERY_ALL_REPLY_LENGTH {
        &response[QUERY_ALL_GROUP_OFFSET..QUERY_ALL_GROUP_OFFSET + DOOR_GROUP_COUNT]
    } else {
        response
    };

    Ok(groups.iter().copied().map(StatusBits::new).collect())
}

/// Steady-state of a door, as reported by a status query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorState {
    Locked,
    Open,
}

impl DoorState {
    /// Interpret an individual query status byte.
    ///
    /// # Errors
    /// Returns `Error::MalformedInput` for a code other than closed or open.
    pub fn from_status(status: u8) -> Result<Self> {
        match status {
            CLOSED_STATUS => Ok(Self::Locked),
            OPEN_STATUS => Ok(Self::Open),
            other => Err(Error::malformed(format!(
                "Unknown door status code {other:#04X}"
            ))),
        }
    }

    fn from_bit(set: bool) -> Self {
        if set { Self::Locked } else { Self::Open }
    }
}

impl fmt::Display for DoorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locked => write!(f, "locked"),
            Self::Open => write!(f, "open"),
        }
    }
}

/// Result of an individual unlock, as reported in its reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlockOutcome {
    /// The door released.
    Unlocked,
    /// The board reports the door still closed.
    Failed,
}

impl UnlockOutcome {
    /// Interpret an individual unlock status byte.
    ///
    /// # Errors
    /// Returns `Error::MalformedInput` for a code other than closed or open.
    pub fn from_status(status: u8) -> Result<Self> {
        match DoorState::from_status(status)? {
            DoorState::Locked => Ok(Self::Failed),
            DoorState::Open => Ok(Self::Unlocked),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Unlocked)
    }
}

impl fmt::Display for UnlockOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlocked => write!(f, "unlocked"),
            Self::Failed => write!(f, "unlock failed"),
        }
    }
}

/// Eight doors reported by one status byte.
///
/// Groups only come out of a [`DoorBank`], so `first_door` is always 1, 9
/// or 17.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DoorGroup {
    first_door: u8,
    status: StatusBits,
}

impl DoorGroup {
    /// Lowest door number in the group (1, 9 or 17).
    #[must_use]
    pub const fn first_door(&self) -> u8 {
        self.first_door
    }

    #[must_use]
    pub const fn status(&self) -> StatusBits {
        self.status
    }

    /// Whether `door` belongs to this group.
    #[must_use]
    pub fn contains(&self, door: DoorNumber) -> bool {
        self.bit_index(door).is_some()
    }

    /// State of `door`, or `None` if it is not in this group.
    #[must_use]
    pub fn door_state(&self, door: DoorNumber) -> Option<DoorState> {
        self.bit_index(door)
            .map(|index| DoorState::from_bit(self.status.is_set(index)))
    }

    fn bit_index(&self, door: DoorNumber) -> Option<u8> {
        door.as_u8()
            .checked_sub(self.first_door)
            .filter(|index| *index < DOORS_PER_GROUP)
    }
}

/// States of all 24 doors, decoded from a "query all" reply.
///
/// Serialized for reports only; a bank is always rebuilt from reply bytes
/// with [`DoorBank::from_groups`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoorBank {
    /// Groups in reply order: doors 17-24, 9-16, 1-8.
    groups: [DoorGroup; DOOR_GROUP_COUNT],
}

impl DoorBank {
    /// Build from the three status bytes, in reply order (17-24, 9-16, 1-8).
    #[must_use]
    pub fn from_groups(status: [u8; DOOR_GROUP_COUNT]) -> Self {
        let [high, mid, low] = status;
        Self {
            groups: [
                DoorGroup {
                    first_door: 17,
                    status: StatusBits::new(high),
                },
                DoorGroup {
                    first_door: 9,
                    status: StatusBits::new(mid),
                },
                DoorGroup {
                    first_door: 1,
                    status: StatusBits::new(low),
                },
            ],
        }
    }

    /// Groups in reply order.
    pub fn groups(&self) -> &[DoorGroup] {
        &self.groups
    }

    #[must_use]
    pub fn state(&self, door: DoorNumber) -> DoorState {
        let offset = door.as_u8() - 1;
        // Reply order puts doors 1-8 last.
        let group = &self.groups[DOOR_GROUP_COUNT - 1 - usize::from(offset / DOORS_PER_GROUP)];
        DoorState::from_bit(group.status.is_set(offset % DOORS_PER_GROUP))
    }

    /// Every door with its state, in ascending door order.
    pub fn iter(&self) -> impl Iterator<Item = (DoorNumber, DoorState)> + '_ {
        DoorNumber::all().map(|door| (door, self.state(door)))
    }

    pub fn locked_doors(&self) -> Vec<DoorNumber> {
        self.doors_in(DoorState::Locked)
    }

    pub fn open_doors(&self) -> Vec<DoorNumber> {
        self.doors_in(DoorState::Open)
    }

    fn doors_in(&self, wanted: DoorState) -> Vec<DoorNumber> {
        self.iter()
            .filter(|(_, state)| *state == wanted)
            .map(|(door, _)| door)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn door(n: u8) -> DoorNumber {
        DoorNumber::new(n).unwrap()
    }

    fn render(bits: &[StatusBits]) -> Vec<String> {
        bits.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_decode_query_all_reply() {
        let reply = [0x80, 0x01, 0x01, 0x01, 0x01, 0x33, 0xB3];
        let groups = decode_door_states(&reply).unwrap();
        assert_eq!(render(&groups), ["00000001", "00000001", "00000001"]);
    }

    #[test]
    fn test_decode_query_all_group_order() {
        let reply = [0x80, 0x01, 0xF0, 0x0F, 0x81, 0x33, 0x00];
        let groups = decode_door_states(&reply).unwrap();
        assert_eq!(render(&groups), ["11110000", "00001111", "10000001"]);
    }

    #[test]
    fn test_decode_other_lengths_verbatim() {
        let reply = [0x8A, 0x01, 0x0B, 0x00, 0x80];
        let groups = decode_door_states(&reply).unwrap();
        assert_eq!(
            render(&groups),
            ["10001010", "00000001", "00001011", "00000000", "10000000"]
        );
    }

    #[test]
    fn test_decode_empty_is_malformed() {
        assert!(matches!(
            decode_door_states(&[]),
            Err(Error::MalformedInput { .. })
        ));
    }

    #[rstest]
    #[case(0x11, DoorState::Locked, UnlockOutcome::Failed)]
    #[case(0x00, DoorState::Open, UnlockOutcome::Unlocked)]
    fn test_closed_code_depends_on_command(
        #[case] status: u8,
        #[case] state: DoorState,
        #[case] outcome: UnlockOutcome,
    ) {
        assert_eq!(DoorState::from_status(status).unwrap(), state);
        assert_eq!(UnlockOutcome::from_status(status).unwrap(), outcome);
    }

    #[rstest]
    #[case(0x01)]
    #[case(0x33)]
    #[case(0xFF)]
    fn test_unknown_status_code(#[case] status: u8) {
        assert!(DoorState::from_status(status).is_err());
        assert!(UnlockOutcome::from_status(status).is_err());
    }

    #[test]
    fn test_door_bank_lowest_bit_is_lowest_door() {
        let bank = DoorBank::from_groups([0x01, 0x01, 0x01]);
        let locked: Vec<u8> = bank.locked_doors().iter().map(|d| d.as_u8()).collect();
        assert_eq!(locked, [1, 9, 17]);
        assert_eq!(bank.open_doors().len(), 21);
    }

    #[rstest]
    #[case([0x00, 0x00, 0x80], 8, DoorState::Locked)]
    #[case([0x00, 0x02, 0x00], 10, DoorState::Locked)]
    #[case([0x80, 0x00, 0x00], 24, DoorState::Locked)]
    #[case([0x7F, 0xFF, 0xFF], 24, DoorState::Open)]
    fn test_door_bank_state(
        #[case] groups: [u8; 3],
        #[case] n: u8,
        #[case] expected: DoorState,
    ) {
        assert_eq!(DoorBank::from_groups(groups).state(door(n)), expected);
    }

    #[test]
    fn test_group_membership() {
        let bank = DoorBank::from_groups([0xFF, 0x00, 0x00]);
        let high = bank.groups()[0];
        assert_eq!(high.first_door(), 17);
        assert!(high.contains(door(17)));
        assert!(!high.contains(door(16)));
        assert_eq!(high.door_state(door(1)), None);
        assert_eq!(high.door_state(door(20)), Some(DoorState::Locked));
    }

    #[rstest]
    #[case(0)]
    #[case(247)]
    #[case(252)]
    #[case(255)]
    fn test_group_membership_never_overflows(#[case] first_door: u8) {
        let group = DoorGroup {
            first_door,
            status: StatusBits::new(0xFF),
        };
        for door in DoorNumber::all() {
            let expected = door.as_u8() >= first_door && door.as_u8() - first_door < 8;
            assert_eq!(group.contains(door), expected);
            assert_eq!(group.door_state(door).is_some(), expected);
        }
    }

    #[test]
    fn test_every_door_in_exactly_one_group() {
        let bank = DoorBank::from_groups([0x00, 0x00, 0x00]);
        for door in DoorNumber::all() {
            let owners = bank.groups().iter().filter(|g| g.contains(door)).count();
            assert_eq!(owners, 1, "door {door}");
        }
    }

    #[test]
    fn test_door_bank_serializes_states() {
        let bank = DoorBank::from_groups([0x00, 0x00, 0x01]);
        let json = serde_json::to_value(&bank).unwrap();
        assert_eq!(json["groups"][2]["first_door"], 1);
        assert_eq!(json["groups"][2]["status"], 1);
        assert_eq!(serde_json::to_value(DoorState::Locked).unwrap(), "locked");
    }
}
