//! Connection time configuration of a PSU session.

use crate::profile::{DeviceProfile, HCS_3202};

/// Use this type to describe how a session should be set up, then pass it to
/// [`HcsPsu::connect`](crate::psu::HcsPsu::connect).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    /// Model parameters of the connected PSU.
    pub profile: DeviceProfile,
    /// Soft limit for the output voltage in volts. Defaults to the device maximum.
    pub voltage_limit: Option<f32>,
    /// Soft limit for the output current in amps. Defaults to the device maximum.
    pub current_limit: Option<f32>,
    /// Skip the `GMAX` query and treat the device maximum as unlimited.
    pub blind: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(HCS_3202)
    }
}

impl SessionConfig {
    pub const fn new(profile: DeviceProfile) -> Self {
        Self {
            profile,
            voltage_limit: None,
            current_limit: None,
            blind: false,
        }
    }

    /// Set the voltage soft limit in volts.
    pub const fn with_voltage_limit(mut self, volts: f32) -> Self {
        self.voltage_limit = Some(volts);
        self
    }

    /// Set the current soft limit in amps.
    pub const fn with_current_limit(mut self, amps: f32) -> Self {
        self.current_limit = Some(amps);
        self
    }

    /// Don't ask the device for its ratings.
    ///
    /// Useful when the PSU doesn't implement `GMAX`. Only the soft limits and the wire field width then bound
    /// the values which can be set.
    pub const fn blind(mut self) -> Self {
        self.blind = true;
        self
    }
}
