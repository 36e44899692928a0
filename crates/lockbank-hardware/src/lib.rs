//! Bus transport for the locker controller board.
//!
//! This crate moves [`lockbank_protocol`] frames over the RS-485 bus and
//! turns the replies into typed results.
//!
//! # Layers
//!
//! - [`traits`]: the [`BusTransport`] / [`BusLink`] seam between dispatch
//!   logic and the physical port.
//! - [`serial`]: the real transport, backed by the `serialport` crate.
//! - [`mock`]: a scripted transport for tests and development without a
//!   board attached.
//! - [`dispatcher`]: one bounded write-then-read exchange per call.
//! - [`controller`]: one call per command type, with replies decoded.
//!
//! # Error Handling
//!
//! Every operation returns [`Result<T>`][error::Result] with a
//! [`DispatchError`]. Failures are never fatal and never retried here; the
//! port is released before the error is returned.
//!
//! # Concurrency
//!
//! Dispatch is synchronous and blocks the calling thread for the write and
//! the bounded read. The bus carries one frame at a time, and nothing in this
//! crate serializes access across dispatchers; share one bus through a single
//! owner or a lock.

pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod mock;
pub mod serial;
pub mod traits;

// Re-export commonly used types for convenience
pub use config::{BusConfig, LineSettings};
pub use controller::{CommandReport, LockerController};
pub use dispatcher::{DispatchResult, DispatchState, Dispatcher, RawResponse};
pub use error::{DispatchError, Result};
pub use serial::SerialTransport;
pub use traits::{BusLink, BusTransport};
