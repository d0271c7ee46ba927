//! This module contains the value types shared by the codec and the PSU session.

use strum_macros::{Display, EnumIter};

/// The two quantities the PSU regulates.
#[derive(Debug, Display, EnumIter, PartialEq, Eq, Clone, Copy)]
pub enum Quantity {
    /// Output voltage, "U" in the device documentation.
    #[strum(serialize = "voltage")]
    Voltage,
    /// Output current, "I" in the device documentation.
    #[strum(serialize = "current")]
    Current,
}

/// Represents the two possible power supply control modes.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ControlMode {
    /// Constant voltage regulation mode.
    Cv,
    /// Constant current regulation mode.
    Cc,
}

impl ControlMode {
    /// Interpret the mode flag trailing a `GETD` response.
    pub fn from_flag(flag: u8) -> Self {
        match flag {
            b'1' => ControlMode::Cc,
            _ => ControlMode::Cv,
        }
    }

    pub fn is_constant_current(&self) -> bool {
        matches!(self, ControlMode::Cc)
    }
}

/// Used to be less ambiguous and whether something is on or off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum State {
    /// Disabled.
    #[default]
    Off,
    /// Enabled.
    On,
}

impl From<State> for bool {
    fn from(value: State) -> Self {
        match value {
            State::Off => false,
            State::On => true,
        }
    }
}

impl From<bool> for State {
    fn from(value: bool) -> Self {
        match value {
            true => State::On,
            false => State::Off,
        }
    }
}

/// A voltage/current pair in volts and amps.
///
/// Used for the device floor, the device maximum rating and the session soft limit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub voltage: f32,
    pub current: f32,
}

impl Limits {
    pub const fn new(voltage: f32, current: f32) -> Self {
        Self { voltage, current }
    }

    /// Return the limit for one quantity.
    pub const fn get(&self, quantity: Quantity) -> f32 {
        match quantity {
            Quantity::Voltage => self.voltage,
            Quantity::Current => self.current,
        }
    }
}
