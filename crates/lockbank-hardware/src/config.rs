//! Bus configuration.
//!
//! [`BusConfig`] is the only place a port identifier lives. It is passed to
//! the controller explicitly, so two controllers can address two buses
//! without sharing any process-wide state.
//!
//! [`LineSettings`] describes the serial line. The boards run a fixed
//! 9600 8N1 line without flow control, so only the read timeout varies, and
//! only the dispatcher changes it.

use lockbank_core::{
    BoardAddress,
    constants::{BAUD_RATE, DEFAULT_READ_TIMEOUT_MS},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which bus to talk to and which board on it.
///
/// # Examples
///
/// ```
/// use lockbank_hardware::BusConfig;
/// use lockbank_core::BoardAddress;
///
/// let config = BusConfig::new("/dev/ttyUSB0");
/// assert_eq!(config.board_address, BoardAddress::SINGLE_BOARD);
///
/// let config = BusConfig::new("COM3").with_board_address(BoardAddress::new(2));
/// assert_eq!(config.board_address.as_u8(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusConfig {
    /// Platform-specific device path (`/dev/ttyUSB0`, `COM3`).
    pub port: String,

    /// Board address placed in every frame.
    ///
    /// Defaults to the single-board address `0x01`.
    #[serde(default)]
    pub board_address: BoardAddress,
}

impl BusConfig {
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            board_address: BoardAddress::SINGLE_BOARD,
        }
    }

    /// Set the board address.
    pub fn with_board_address(mut self, board_address: BoardAddress) -> Self {
        self.board_address = board_address;
        self
    }
}

/// Serial line parameters used when opening the bus.
///
/// Data bits (8), parity (none), stop bits (1) and flow control (none) are
/// fixed by the board and not represented here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSettings {
    pub baud_rate: u32,

    /// Read timeout applied when the port is opened.
    pub read_timeout: Duration,
}

impl Default for LineSettings {
    fn default() -> Self {
        Self {
            baud_rate: BAUD_RATE,
            read_timeout: Duration::from_millis(DEFAULT_READ_TIMEOUT_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_settings_default() {
        let settings = LineSettings::default();
        assert_eq!(settings.baud_rate, 9600);
        assert_eq!(settings.read_timeout, Duration::from_millis(750));
    }

    #[test]
    fn test_bus_config_deserialize_defaults_board() {
        let config: BusConfig = serde_json::from_str(r#"{"port": "/dev/ttyUSB0"}"#).unwrap();
        assert_eq!(config, BusConfig::new("/dev/ttyUSB0"));
    }

    #[test]
    fn test_bus_config_deserialize_board() {
        let config: BusConfig =
            serde_json::from_str(r#"{"port": "COM3", "board_address": 4}"#).unwrap();
        assert_eq!(config.board_address, BoardAddress::new(4));
    }
}
