//! Bus transport trait definitions.
//!
//! The dispatcher talks to the bus through two traits:
//!
//! - [`BusTransport`] opens a link to a port. It holds no connection itself
//!   and can be shared by every dispatch on that bus.
//! - [`BusLink`] is one open connection. It is owned by exactly one dispatch
//!   and closed when dropped.
//!
//! Keeping the link an owned value ties the open port to the lifetime of one
//! exchange: whichever way the exchange ends, the link goes out of scope and
//! the port is released.
//!
//! Implementations are provided for real serial ports
//! ([`SerialTransport`](crate::serial::SerialTransport)) and for tests
//! ([`MockTransport`](crate::mock::MockTransport)).
//!
//! # Examples
//!
//! ```no_run
//! use lockbank_hardware::traits::{BusLink, BusTransport};
//! use lockbank_hardware::{LineSettings, SerialTransport};
//! use std::time::Duration;
//!
//! # fn main() -> std::io::Result<()> {
//! let mut link = SerialTransport.open("/dev/ttyUSB0", &LineSettings::default())?;
//! link.write_frame(&[0x80, 0x01, 0x00, 0x33, 0xB2])?;
//! link.set_timeout(Duration::from_millis(750))?;
//!
//! let mut reply = [0u8; 7];
//! let n = link.read(&mut reply)?;
//! println!("{} bytes", n);
//! # Ok(())
//! # }
//! ```

use crate::config::LineSettings;
use std::io;
use std::time::Duration;

/// One open connection to the bus.
///
/// Dropping the link closes the underlying port.
pub trait BusLink {
    /// Write a whole frame in one operation and flush it onto the line.
    ///
    /// # Errors
    ///
    /// Returns an error if the port rejects the write (adapter unplugged,
    /// device gone).
    fn write_frame(&mut self, frame: &[u8]) -> io::Result<()>;

    /// Set how long a single [`read`](BusLink::read) may block.
    fn set_timeout(&mut self, timeout: Duration) -> io::Result<()>;

    /// Read whatever bytes arrive within the current timeout.
    ///
    /// Returns `Ok(0)` if the timeout elapsed with no data. That is not an
    /// error at this level; the dispatcher decides what silence means.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Factory for [`BusLink`]s.
pub trait BusTransport {
    type Link: BusLink;

    /// Open `port` with the given line settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the port does not exist, is busy, or cannot be
    /// configured.
    fn open(&self, port: &str, settings: &LineSettings) -> io::Result<Self::Link>;
}

impl<T: BusTransport + ?Sized> BusTransport for &T {
    type Link = T::Link;

    fn open(&self, port: &str, settings: &LineSettings) -> io::Result<Self::Link> {
        (**self).open(port, settings)
    }
}
