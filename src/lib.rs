//! This crate provides an interface for communicating with and controlling the HCS series of programmable bench power supplies.
//!
//! It supports `no-std` environments by use of the `no_std` feature flag.
//!
//! Supported PSU model numbers:
//! * HCS-3202
//!
//! Other HCS models speak the same protocol but use different field widths. Describe them with a
//! [`DeviceProfile`](profile::DeviceProfile) and pass it in through a [`SessionConfig`](config::SessionConfig).
//!
//! The PSU uses a plain ASCII command/response protocol. Every command is terminated with a carriage return and
//! every accepted command is answered with `OK` followed by a carriage return.
//!
//! The serial port used for PSU comms should be configured like so:
//! * Baud rate: 9600 (see [`BAUD_RATE`](psu::BAUD_RATE))
//! * Data bits: 8
//! * Stop bits: 1
//! * Parity: None
//! * Read timeout: 500ms (see [`RESPONSE_TIMEOUT`](psu::RESPONSE_TIMEOUT))
//!
//! The driver logs through the [`log`] facade. Nothing is printed unless the application installs a logger.

#![cfg_attr(feature = "no_std", no_std)]

pub mod codec;
pub mod command;
pub mod config;
pub mod error;
pub mod profile;
pub mod psu;
pub mod types;

#[cfg(test)]
mod mock_serial;
