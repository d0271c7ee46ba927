//! Parameter tables for different PSU models
//!
//! Different HCS models use different field widths for voltage and current, have a different lowest settable
//! output and do not agree on which `SOUT` byte switches the output on. This module defines those parameters
//! for each known model.

use crate::{
    error::CodecError,
    types::{Limits, Quantity, State},
};

/// Number of fractional decimal digits used for each quantity in a wire field.
///
/// A field for a quantity with `d` decimals is `d + 2` ASCII digits wide and holds the value scaled by `10^d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalSpec {
    pub voltage: Option<u8>,
    pub current: Option<u8>,
}

impl DecimalSpec {
    /// No decimal counts known. Any operation needing them fails.
    pub const UNSET: Self = Self {
        voltage: None,
        current: None,
    };

    pub const fn new(voltage: u8, current: u8) -> Self {
        Self {
            voltage: Some(voltage),
            current: Some(current),
        }
    }

    /// Return the decimal count for a quantity, or an error if the profile never set it.
    pub fn decimals(&self, quantity: Quantity) -> Result<u8, CodecError> {
        let decimals = match quantity {
            Quantity::Voltage => self.voltage,
            Quantity::Current => self.current,
        };
        decimals.ok_or(CodecError::UnconfiguredDecimals(quantity))
    }

    /// Width in bytes of the wire field for a quantity.
    pub fn width(&self, quantity: Quantity) -> Result<usize, CodecError> {
        Ok(self.decimals(quantity)? as usize + 2)
    }

    /// The factor between a value and its wire representation, `10^decimals`.
    pub fn scale(&self, quantity: Quantity) -> Result<f32, CodecError> {
        let decimals = self.decimals(quantity)?;
        Ok((0..decimals).fold(1.0, |scale, _| scale * 10.0))
    }
}

/// Order of the voltage and current fields in a `GETD` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldOrder {
    #[default]
    VoltageFirst,
    CurrentFirst,
}

/// Bytes sent with `SOUT` for each output state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputPolarity {
    pub enabled: u8,
    pub disabled: u8,
}

impl OutputPolarity {
    /// `'1'` switches the output on.
    pub const ACTIVE_HIGH: Self = Self {
        enabled: b'1',
        disabled: b'0',
    };
    /// `'0'` switches the output on.
    pub const ACTIVE_LOW: Self = Self {
        enabled: b'0',
        disabled: b'1',
    };

    pub const fn byte(&self, state: State) -> u8 {
        match state {
            State::On => self.enabled,
            State::Off => self.disabled,
        }
    }
}

/// Everything the session needs to know about one PSU model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceProfile {
    pub name: &'static str,
    /// Decimals used by `VOLT`/`CURR` payloads and the `GETS`/`GMAX` responses.
    pub set_decimals: DecimalSpec,
    /// Decimals used by the `GETD` response.
    pub display_decimals: DecimalSpec,
    pub display_order: FieldOrder,
    /// Lowest value the firmware accepts. Lower requests are clamped up to this.
    pub minimum: Limits,
    pub output_polarity: OutputPolarity,
}

impl DeviceProfile {
    /// Start a profile with nothing configured. Fill it in with the `with_*` methods.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            set_decimals: DecimalSpec::UNSET,
            display_decimals: DecimalSpec::UNSET,
            display_order: FieldOrder::VoltageFirst,
            minimum: Limits::new(0.0, 0.0),
            output_polarity: OutputPolarity::ACTIVE_HIGH,
        }
    }

    pub const fn with_set_decimals(mut self, voltage: u8, current: u8) -> Self {
        self.set_decimals = DecimalSpec::new(voltage, current);
        self
    }

    pub const fn with_display_decimals(mut self, voltage: u8, current: u8) -> Self {
        self.display_decimals = DecimalSpec::new(voltage, current);
        self
    }

    pub const fn with_display_order(mut self, order: FieldOrder) -> Self {
        self.display_order = order;
        self
    }

    pub const fn with_minimum(mut self, voltage: f32, current: f32) -> Self {
        self.minimum = Limits::new(voltage, current);
        self
    }

    pub const fn with_output_polarity(mut self, polarity: OutputPolarity) -> Self {
        self.output_polarity = polarity;
        self
    }
}

/// Protocol defaults shared by the whole family, without any model specific tables.
///
/// Sessions using this profile can switch the output but every voltage/current operation fails with
/// [`Error::UnconfiguredDecimals`](crate::error::Error::UnconfiguredDecimals).
pub const GENERIC: DeviceProfile = DeviceProfile::new("HCS");

// @TODO: Verify the output polarity and display field order on hardware other than the 3202.
pub const HCS_3202: DeviceProfile = DeviceProfile::new("HCS-3202")
    .with_set_decimals(1, 1)
    .with_display_decimals(2, 2)
    .with_display_order(FieldOrder::VoltageFirst)
    .with_minimum(0.8, 0.1)
    .with_output_polarity(OutputPolarity::ACTIVE_LOW);
