//! Command dispatch over the locker bus.
//!
//! One call to [`Dispatcher::send_command`] is one complete exchange:
//!
//! ```text
//! Idle ──► Opening ──► Writing ──► Reading(timeout) ──► Success ────────┐
//!             │           │              │                               │
//!             │           │              ├──────────► Timeout ───────────┤
//!             │           │              │                               ├──► Closed
//!             └───────────┴──────────────┴──────────► TransportFault ────┘
//! ```
//!
//! The open link is owned by a session value for the duration of the
//! exchange and closed when the session goes out of scope, on every path
//! out of the exchange.
//!
//! # Reply Timing
//!
//! The read waits for exactly [`CommandType::reply_len`] bytes and returns as
//! soon as they have arrived. If they have not arrived by the end of the
//! command's window ([`CommandType::read_timeout`]), the exchange fails with
//! [`DispatchError::Timeout`]. "Unlock all" gets a 10 s window instead of the
//! 750 ms default because the board actuates every door before replying.
//!
//! # Bus Sharing
//!
//! The bus is half-duplex: only one frame may be in flight. `send_command`
//! takes `&mut self`, so a dispatcher never runs two exchanges at once.
//! Callers that share one bus between several dispatchers must serialize
//! them (for example behind a `Mutex`). There is no retry and no
//! cancellation; both belong to the caller.
//!
//! # Examples
//!
//! ```no_run
//! use lockbank_hardware::{Dispatcher, SerialTransport};
//! use lockbank_core::{BoardAddress, LockAddress};
//! use lockbank_protocol::{CommandFrame, CommandType};
//!
//! let mut dispatcher = Dispatcher::new(SerialTransport);
//! let frame = CommandFrame::unlock(BoardAddress::SINGLE_BOARD, LockAddress::new(5));
//!
//! match dispatcher.send_command("/dev/ttyUSB0", frame.as_bytes(), CommandType::UnlockIndividual) {
//!     Ok(reply) => println!("reply: {:02X?}", &reply[..]),
//!     Err(e) => eprintln!("unlock failed: {}", e),
//! }
//! ```

use crate::config::LineSettings;
use crate::error::DispatchError;
use crate::traits::{BusLink, BusTransport};
use bytes::Bytes;
use lockbank_protocol::{CommandType, to_hex};
use std::fmt;
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// Raw bytes of a board reply.
pub type RawResponse = Bytes;

/// Outcome of one exchange.
pub type DispatchResult = std::result::Result<RawResponse, DispatchError>;

/// Stage of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    Opening,
    Writing,
    Reading { timeout: Duration },
    Success,
    Timeout,
    TransportFault,
    Closed,
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Opening => write!(f, "Opening"),
            Self::Writing => write!(f, "Writing"),
            Self::Reading { timeout } => write!(f, "Reading({}ms)", timeout.as_millis()),
            Self::Success => write!(f, "Success"),
            Self::Timeout => write!(f, "Timeout"),
            Self::TransportFault => write!(f, "TransportFault"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}

/// An open link scoped to one exchange. Dropping it closes the port.
#[derive(Debug)]
struct BusSession<'a, L: BusLink> {
    port: &'a str,
    link: L,
}

impl<'a, L: BusLink> BusSession<'a, L> {
    fn new(port: &'a str, link: L) -> Self {
        trace!("Opened session on {}", port);
        Self { port, link }
    }

    /// Read up to `expected` bytes, giving up when `window` has elapsed.
    ///
    /// The first read uses the timeout already set on the link; later reads
    /// only get what is left of the window.
    fn read_reply(&mut self, expected: usize, window: Duration) -> io::Result<Vec<u8>> {
        let deadline = Instant::now() + window;
        let mut reply = vec![0u8; expected];
        let mut filled = 0;

        while filled < expected {
            if filled > 0 {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    break;
                }
                self.link.set_timeout(remaining)?;
            }

            let n = self.link.read(&mut reply[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
            trace!("Received {}/{} bytes on {}", filled, expected, self.port);
        }

        reply.truncate(filled);
        Ok(reply)
    }
}

impl<L: BusLink> Drop for BusSession<'_, L> {
    fn drop(&mut self) {
        debug!("Closing {}", self.port);
    }
}

/// Whole milliseconds in `window`, saturating at `u64::MAX`.
fn window_millis(window: Duration) -> u64 {
    u64::try_from(window.as_millis()).unwrap_or(u64::MAX)
}

/// Sends frames and collects replies, one exchange at a time.
#[derive(Debug)]
pub struct Dispatcher<T: BusTransport> {
    transport: T,
    settings: LineSettings,
    trail: Vec<DispatchState>,
}

impl<T: BusTransport> Dispatcher<T> {
    /// Create a dispatcher with the board's fixed line settings.
    pub fn new(transport: T) -> Self {
        Self::with_settings(transport, LineSettings::default())
    }

    pub fn with_settings(transport: T, settings: LineSettings) -> Self {
        Self {
            transport,
            settings,
            trail: vec![DispatchState::Idle],
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn settings(&self) -> &LineSettings {
        &self.settings
    }

    /// Current stage. `Closed` after any completed exchange.
    pub fn state(&self) -> DispatchState {
        self.trail.last().copied().unwrap_or(DispatchState::Idle)
    }

    /// Stages passed through by the most recent exchange, in order.
    pub fn last_transitions(&self) -> &[DispatchState] {
        &self.trail
    }

    /// Dispatch using a two-letter command code (`UA`, `UI`, `QI`, `QA`).
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnrecognizedCommandType`] for any other code,
    /// without opening the port or writing anything. Otherwise as
    /// [`send_command`](Self::send_command).
    pub fn send_command_code(&mut self, port: &str, frame: &[u8], code: &str) -> DispatchResult {
        let command_type = code.parse::<CommandType>().map_err(|e| {
            warn!("Refusing to dispatch on {}: {}", port, e);
            DispatchError::from(e)
        })?;
        self.send_command(port, frame, command_type)
    }

    /// Write `frame` to `port` and wait for the reply `command_type` calls for.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::TransportUnavailable`] if the port cannot be
    ///   opened, configured, written or read.
    /// - [`DispatchError::Timeout`] if the full reply does not arrive within
    ///   the command's window.
    pub fn send_command(
        &mut self,
        port: &str,
        frame: &[u8],
        command_type: CommandType,
    ) -> DispatchResult {
        self.trail.clear();
        self.transition(DispatchState::Idle);

        let result = self.exchange(port, frame, command_type);
        self.transition(DispatchState::Closed);

        match &result {
            Ok(reply) => info!(
                "{} on {}: {} -> {}",
                command_type,
                port,
                to_hex(frame),
                to_hex(reply)
            ),
            Err(e) => warn!("{} on {}: {} failed: {}", command_type, port, to_hex(frame), e),
        }
        result
    }

    fn exchange(&mut self, port: &str, frame: &[u8], command_type: CommandType) -> DispatchResult {
        self.transition(DispatchState::Opening);
        let link = match self.transport.open(port, &self.settings) {
            Ok(link) => link,
            Err(e) => return Err(self.fault(port, e)),
        };
        let mut session = BusSession::new(port, link);

        self.transition(DispatchState::Writing);
        if let Err(e) = session.link.write_frame(frame) {
            return Err(self.fault(port, e));
        }

        let expected = command_type.reply_len();
        let window = command_type.read_timeout();
        if window != self.settings.read_timeout {
            if let Err(e) = session.link.set_timeout(window) {
                return Err(self.fault(port, e));
            }
        }

        self.transition(DispatchState::Reading { timeout: window });
        let reply = match session.read_reply(expected, window) {
            Ok(reply) => reply,
            Err(e) => return Err(self.fault(port, e)),
        };

        if reply.len() < expected {
            self.transition(DispatchState::Timeout);
            return Err(DispatchError::timeout(
                expected,
                reply.len(),
                window_millis(window),
            ));
        }

        self.transition(DispatchState::Success);
        Ok(Bytes::from(reply))
    }

    fn fault(&mut self, port: &str, error: io::Error) -> DispatchError {
        self.transition(DispatchState::TransportFault);
        DispatchError::transport(port, error)
    }

    fn transition(&mut self, next: DispatchState) {
        if let Some(current) = self.trail.last() {
            trace!("Dispatch {} -> {}", current, next);
        }
        self.trail.push(next);
    }
}
