//! Locker controller facade.
//!
//! [`LockerController`] is what the rest of the application calls. It knows
//! which bus and board to address ([`BusConfig`]), builds the right frame for
//! each operation, dispatches it, and decodes the reply in the context of the
//! command that produced it.
//!
//! The controller does not check permissions. Callers must have authorised
//! the requesting user for the door(s) before calling it, and are expected
//! to record the returned [`CommandReport`] for audit.
//!
//! # Examples
//!
//! ```no_run
//! use lockbank_hardware::{BusConfig, LockerController, SerialTransport};
//! use lockbank_core::DoorNumber;
//! use lockbank_protocol::UnlockOutcome;
//!
//! # fn main() -> lockbank_hardware::Result<()> {
//! let mut controller = LockerController::new(BusConfig::new("/dev/ttyUSB0"), SerialTransport);
//!
//! let door = DoorNumber::new(5)?;
//! let report = controller.unlock_door(door)?;
//! if report.value == UnlockOutcome::Failed {
//!     eprintln!("door {} did not open", door);
//! }
//!
//! let bank = controller.query_all()?.value;
//! println!("locked: {:?}", bank.locked_doors());
//! # Ok(())
//! # }
//! ```

use crate::config::BusConfig;
use crate::dispatcher::{Dispatcher, RawResponse};
use crate::error::Result;
use crate::traits::BusTransport;
use lockbank_core::{DoorNumber, LockAddress};
use lockbank_protocol::{
    CommandFrame, CommandType, DoorBank, DoorState, IndividualReply, QueryAllReply,
    UnlockOutcome, to_hex,
};
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

/// Everything the caller needs to display or audit one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandReport<T> {
    pub command: CommandType,

    /// Door addressed, or `None` for the all-doors commands.
    pub door: Option<DoorNumber>,

    #[serde(serialize_with = "serialize_hex")]
    pub frame: CommandFrame,

    #[serde(serialize_with = "serialize_hex")]
    pub reply: RawResponse,

    /// Whether the reply's trailing XOR8 matched its contents.
    pub checksum_ok: bool,

    /// The reply decoded for this command.
    pub value: T,
}

fn serialize_hex<B, S>(bytes: &B, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    B: AsRef<[u8]>,
    S: Serializer,
{
    serializer.serialize_str(&to_hex(bytes.as_ref()))
}

/// Issues locker commands on one board.
#[derive(Debug)]
pub struct LockerController<T: BusTransport> {
    config: BusConfig,
    dispatcher: Dispatcher<T>,
}

impl<T: BusTransport> LockerController<T> {
    pub fn new(config: BusConfig, transport: T) -> Self {
        Self::with_dispatcher(config, Dispatcher::new(transport))
    }

    pub fn with_dispatcher(config: BusConfig, dispatcher: Dispatcher<T>) -> Self {
        Self { config, dispatcher }
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    /// Open every door in sequence. Blocks for up to 10 s.
    ///
    /// # Errors
    ///
    /// Any [`DispatchError`](crate::DispatchError) from the exchange.
    pub fn unlock_all(&mut self) -> Result<CommandReport<()>> {
        let (frame, reply) = self.exchange(CommandType::UnlockAll, LockAddress::ALL)?;
        let checksum_ok = IndividualReply::parse(&reply)?.checksum_ok();
        if !checksum_ok {
            warn!("Unlock-all reply checksum mismatch: {}", to_hex(&reply));
        }
        Ok(self.report(CommandType::UnlockAll, None, frame, reply, checksum_ok, ()))
    }

    /// Open one door and report whether it released.
    ///
    /// # Errors
    ///
    /// Any [`DispatchError`](crate::DispatchError) from the exchange, or
    /// `MalformedInput` if the reply carries an unknown status code.
    pub fn unlock_door(&mut self, door: DoorNumber) -> Result<CommandReport<UnlockOutcome>> {
        let (frame, reply) = self.exchange(CommandType::UnlockIndividual, door.into())?;
        let parsed = self.individual_reply(&reply, door)?;
        let outcome = parsed.unlock_outcome()?;
        Ok(self.report(
            CommandType::UnlockIndividual,
            Some(door),
            frame,
            reply,
            parsed.checksum_ok(),
            outcome,
        ))
    }

    /// Read whether one door is locked.
    ///
    /// # Errors
    ///
    /// Any [`DispatchError`](crate::DispatchError) from the exchange, or
    /// `MalformedInput` if the reply carries an unknown status code.
    pub fn query_door(&mut self, door: DoorNumber) -> Result<CommandReport<DoorState>> {
        let (frame, reply) = self.exchange(CommandType::QueryIndividual, door.into())?;
        let parsed = self.individual_reply(&reply, door)?;
        let state = parsed.door_state()?;
        Ok(self.report(
            CommandType::QueryIndividual,
            Some(door),
            frame,
            reply,
            parsed.checksum_ok(),
            state,
        ))
    }

    /// Read the state of every door.
    ///
    /// # Errors
    ///
    /// Any [`DispatchError`](crate::DispatchError) from the exchange.
    pub fn query_all(&mut self) -> Result<CommandReport<DoorBank>> {
        let (frame, reply) = self.exchange(CommandType::QueryAll, LockAddress::ALL)?;
        let parsed = QueryAllReply::parse(&reply)?;
        if !parsed.checksum_ok() {
            warn!("Query-all reply checksum mismatch: {}", to_hex(&reply));
        }
        let bank = parsed.door_bank();
        Ok(self.report(
            CommandType::QueryAll,
            None,
            frame,
            reply,
            parsed.checksum_ok(),
            bank,
        ))
    }

    fn exchange(
        &mut self,
        command: CommandType,
        lock: LockAddress,
    ) -> Result<(CommandFrame, RawResponse)> {
        let frame = CommandFrame::for_command(command, self.config.board_address, lock);
        debug!(
            "Dispatching {} to board {} lock {}",
            command, self.config.board_address, lock
        );
        let reply = self
            .dispatcher
            .send_command(&self.config.port, frame.as_bytes(), command)?;
        Ok((frame, reply))
    }

    fn individual_reply(&self, reply: &[u8], door: DoorNumber) -> Result<IndividualReply> {
        let parsed = IndividualReply::parse(reply)?;
        if !parsed.checksum_ok() {
            warn!("Reply checksum mismatch for door {}: {}", door, to_hex(reply));
        }
        if parsed.lock_address() != LockAddress::from(door) {
            warn!(
                "Reply names lock {} but door {} was addressed",
                parsed.lock_address(),
                door
            );
        }
        Ok(parsed)
    }

    fn report<V>(
        &self,
        command: CommandType,
        door: Option<DoorNumber>,
        frame: CommandFrame,
        reply: RawResponse,
        checksum_ok: bool,
        value: V,
    ) -> CommandReport<V> {
        CommandReport {
            command,
            door,
            frame,
            reply,
            checksum_ok,
            value,
        }
    }
}
