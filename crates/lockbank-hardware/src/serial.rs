//! Serial port transport backed by the `serialport` crate.
//!
//! The boards sit on an RS-485 bus behind a USB adapter that switches the
//! line direction on its own, so the port is opened as a plain 8N1 serial
//! device without RTS/CTS flow control.

use crate::config::LineSettings;
use crate::traits::{BusLink, BusTransport};
use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{self, Read, Write};
use std::time::Duration;
use tracing::{debug, trace};

/// Opens [`SerialLink`]s on real serial ports.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialTransport;

impl SerialTransport {
    /// Names of the serial ports present on this machine.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform port enumeration fails.
    pub fn available_ports() -> io::Result<Vec<String>> {
        let ports = serialport::available_ports()?;
        Ok(ports.into_iter().map(|p| p.port_name).collect())
    }
}

impl BusTransport for SerialTransport {
    type Link = SerialLink;

    fn open(&self, port: &str, settings: &LineSettings) -> io::Result<SerialLink> {
        debug!(
            "Opening {} at {} baud, timeout {}ms",
            port,
            settings.baud_rate,
            settings.read_timeout.as_millis()
        );

        let serial = serialport::new(port, settings.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(settings.read_timeout)
            .open()?;

        // Bytes left over from an earlier exchange would be taken for the
        // start of this reply.
        serial.clear(ClearBuffer::Input)?;

        Ok(SerialLink {
            name: port.to_string(),
            port: serial,
        })
    }
}

/// An open serial port. Closed on drop.
pub struct SerialLink {
    name: String,
    port: Box<dyn SerialPort>,
}

impl std::fmt::Debug for SerialLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialLink").field("name", &self.name).finish()
    }
}

impl BusLink for SerialLink {
    fn write_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        self.port.write_all(frame)?;
        self.port.flush()
    }

    fn set_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.port.set_timeout(timeout)?;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = silence_as_empty(self.port.read(buf))?;
        trace!("Read {} bytes from {}", n, self.name);
        Ok(n)
    }
}

/// A read that times out found no data; any other error is a fault.
fn silence_as_empty(result: io::Result<usize>) -> io::Result<usize> {
    match result {
        Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(0),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_timed_out_read_is_empty() {
        let result = silence_as_empty(Err(io::Error::new(io::ErrorKind::TimedOut, "timed out")));
        assert_eq!(result.unwrap(), 0);
    }

    #[rstest]
    #[case(io::ErrorKind::BrokenPipe)]
    #[case(io::ErrorKind::NotFound)]
    #[case(io::ErrorKind::WouldBlock)]
    fn test_other_read_errors_are_faults(#[case] kind: io::ErrorKind) {
        let err = silence_as_empty(Err(io::Error::new(kind, "adapter gone"))).unwrap_err();
        assert_eq!(err.kind(), kind);
    }

    #[test]
    fn test_successful_read_passes_through() {
        assert_eq!(silence_as_empty(Ok(5)).unwrap(), 5);
    }

    #[test]
    fn test_open_missing_port_fails() {
        let result = SerialTransport.open("/dev/lockbank-does-not-exist", &LineSettings::default());
        assert!(result.is_err());
    }
}
