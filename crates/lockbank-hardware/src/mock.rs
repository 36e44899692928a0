//! Mock bus transport for testing and development.
//!
//! [`MockTransport`] plays back a script of board behaviours, one per opened
//! link, and records everything the dispatcher does: frames written,
//! timeouts set, simulated time spent waiting, and how many links were
//! opened and closed.
//!
//! Reads never sleep. A read that finds no data adds the current timeout to
//! [`MockTransport::waited`] and returns `0`, so tests can check how long a
//! real port would have blocked without actually waiting for it.
//!
//! # Examples
//!
//! ```
//! use lockbank_hardware::mock::MockTransport;
//! use lockbank_hardware::Dispatcher;
//! use lockbank_protocol::CommandType;
//!
//! let transport = MockTransport::new();
//! transport.push_reply(&[0x8A, 0x01, 0x00, 0x11, 0x9A]);
//!
//! let mut dispatcher = Dispatcher::new(transport.clone());
//! let reply = dispatcher
//!     .send_command("mock0", &[0x8A, 0x01, 0x00, 0x11, 0x9A], CommandType::UnlockAll)
//!     .unwrap();
//!
//! assert_eq!(&reply[..], &[0x8A, 0x01, 0x00, 0x11, 0x9A]);
//! assert_eq!(transport.opened(), 1);
//! assert_eq!(transport.closed(), 1);
//! ```

use crate::config::LineSettings;
use crate::traits::{BusLink, BusTransport};
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Scripted behaviour of the board for one exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockBehaviour {
    /// Bytes become readable in these chunks, then the line goes quiet.
    Reply(Vec<Vec<u8>>),

    /// The board never answers.
    Silent,

    /// Opening the port fails with this message.
    OpenFault(String),

    /// The port opens but the write fails with this message.
    WriteFault(String),

    /// The port opens and accepts the frame, then the read fails.
    ReadFault(String),
}

#[derive(Debug, Default)]
struct MockState {
    script: VecDeque<MockBehaviour>,
    ports: Vec<String>,
    written: Vec<Vec<u8>>,
    timeouts: Vec<Duration>,
    waited: Duration,
    opened: usize,
    closed: usize,
}

/// Scripted in-memory bus.
///
/// Clones share the same script and records, so a test can keep one clone
/// and hand another to the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Create a mock bus with an empty script.
    ///
    /// With nothing scripted, every link behaves as [`MockBehaviour::Silent`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a behaviour for the next opened link.
    pub fn push(&self, behaviour: MockBehaviour) {
        self.lock().script.push_back(behaviour);
    }

    /// Queue a reply delivered in a single read.
    pub fn push_reply(&self, reply: &[u8]) {
        self.push(MockBehaviour::Reply(vec![reply.to_vec()]));
    }

    /// Queue a reply that trickles in over several reads.
    pub fn push_chunks(&self, chunks: Vec<Vec<u8>>) {
        self.push(MockBehaviour::Reply(chunks));
    }

    /// Queue an exchange where the board never answers.
    pub fn push_silence(&self) {
        self.push(MockBehaviour::Silent);
    }

    /// Ports passed to `open`, in order.
    pub fn ports(&self) -> Vec<String> {
        self.lock().ports.clone()
    }

    /// Frames written, in order.
    pub fn written(&self) -> Vec<Vec<u8>> {
        self.lock().written.clone()
    }

    /// Every timeout set on any link, in order.
    pub fn timeouts(&self) -> Vec<Duration> {
        self.lock().timeouts.clone()
    }

    /// Total simulated time spent in reads that returned no data.
    pub fn waited(&self) -> Duration {
        self.lock().waited
    }

    /// Links successfully opened.
    pub fn opened(&self) -> usize {
        self.lock().opened
    }

    /// Links dropped.
    pub fn closed(&self) -> usize {
        self.lock().closed
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BusTransport for MockTransport {
    type Link = MockLink;

    fn open(&self, port: &str, settings: &LineSettings) -> io::Result<MockLink> {
        let mut state = self.lock();
        state.ports.push(port.to_string());

        let behaviour = state.script.pop_front().unwrap_or(MockBehaviour::Silent);
        let (pending, write_fault, read_fault) = match behaviour {
            MockBehaviour::OpenFault(message) => {
                return Err(io::Error::new(io::ErrorKind::NotFound, message));
            }
            MockBehaviour::Reply(chunks) => (chunks.into(), None, None),
            MockBehaviour::Silent => (VecDeque::new(), None, None),
            MockBehaviour::WriteFault(message) => (VecDeque::new(), Some(message), None),
            MockBehaviour::ReadFault(message) => (VecDeque::new(), None, Some(message)),
        };

        state.opened += 1;
        Ok(MockLink {
            state: Arc::clone(&self.state),
            pending,
            timeout: settings.read_timeout,
            write_fault,
            read_fault,
        })
    }
}

/// One scripted exchange. Counts itself closed on drop.
#[derive(Debug)]
pub struct MockLink {
    state: Arc<Mutex<MockState>>,
    pending: VecDeque<Vec<u8>>,
    timeout: Duration,
    write_fault: Option<String>,
    read_fault: Option<String>,
}

impl MockLink {
    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BusLink for MockLink {
    fn write_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        if let Some(message) = &self.write_fault {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, message.clone()));
        }
        self.lock().written.push(frame.to_vec());
        Ok(())
    }

    fn set_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.timeout = timeout;
        self.lock().timeouts.push(timeout);
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(message) = &self.read_fault {
            return Err(io::Error::other(message.clone()));
        }

        let Some(mut chunk) = self.pending.pop_front() else {
            let timeout = self.timeout;
            self.lock().waited += timeout;
            return Ok(0);
        };

        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        if n < chunk.len() {
            self.pending.push_front(chunk.split_off(n));
        }
        Ok(n)
    }
}

impl Drop for MockLink {
    fn drop(&mut self) {
        self.lock().closed += 1;
    }
}
