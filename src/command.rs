//! This module is used to define the commands understood by the HCS PSUs.

use strum_macros::{EnumIter, IntoStaticStr};

use crate::types::Quantity;

/// Carriage return terminating every command and every response line.
pub const CR: u8 = b'\r';

/// Sent by the PSU, followed by [`CR`], once it has accepted a command.
pub const ACK: &[u8] = b"OK";

/// Length of every command mnemonic.
pub const MNEMONIC_LEN: usize = 4;

/// Marker ending every accepted response.
pub const RESPONSE_END: &[u8] = b"OK\r";

#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, IntoStaticStr)]
pub enum Command {
    /// __R__ - Maximum voltage and current the device is rated for.
    ///
    /// Fields use the set-decimal widths.
    #[strum(serialize = "GMAX")]
    GetMax,
    /// __R__ - Preset (target) voltage and current.
    ///
    /// Fields use the set-decimal widths.
    #[strum(serialize = "GETS")]
    GetPreset,
    /// __R__ - Live display voltage and current, followed by the CC/CV flag.
    ///
    /// Fields use the display-decimal widths.
    /// * `0` - CV.
    /// * `1` - CC.
    #[strum(serialize = "GETD")]
    GetDisplay,
    /// __W__ - Target voltage.
    ///
    /// Payload is the voltage scaled by the set decimals. E.g. 12.0V with one decimal => `120`.
    #[strum(serialize = "VOLT")]
    SetVoltage,
    /// __W__ - Target current.
    #[strum(serialize = "CURR")]
    SetCurrent,
    /// __W__ - Switched output. Payload byte polarity depends on the model.
    #[strum(serialize = "SOUT")]
    SetOutput,
}

impl Command {
    /// The four ASCII characters sent on the wire.
    pub fn mnemonic(&self) -> &'static [u8] {
        let name: &'static str = (*self).into();
        name.as_bytes()
    }

    /// The set command for a quantity.
    pub fn set(quantity: Quantity) -> Self {
        match quantity {
            Quantity::Voltage => Command::SetVoltage,
            Quantity::Current => Command::SetCurrent,
        }
    }
}
