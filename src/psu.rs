use crate::{
    codec::{self, Request},
    command::{Command, RESPONSE_END},
    config::SessionConfig,
    error::{Error, RangeError, Result},
    profile::DeviceProfile,
    types::{ControlMode, Limits, Quantity, State},
};
use embedded_io::{Error as _, ErrorKind};
use fugit::MillisDurationU32;
use strum::IntoEnumIterator;

/// Baud rate of the PSU serial interface.
pub const BAUD_RATE: u32 = 9600;

/// How long the interface should wait for a response before giving up.
///
/// Configure this as the read timeout of the serial port. A read that times out before the acknowledgement
/// marker arrived is reported as [`Error::CommandRejected`].
pub const RESPONSE_TIMEOUT: MillisDurationU32 = MillisDurationU32::from_ticks(500);

/// Device maximum used in blind mode, where the ratings are never queried.
pub const UNLIMITED: f32 = f32::MAX;

/// You can create a HcsPsu using any interface which implements [embedded_io::Read] & [embedded_io::Write].
///
/// Every method performs exactly one command/response exchange. The protocol is half-duplex, so a session must not
/// be shared between threads without serializing whole exchanges. Wrapping the session in a `Mutex` does that,
/// since every method takes `&mut self`.
///
/// The session owns the interface. It is released by [`Self::close`], or dropped with the session on any other
/// path, including a failed [`Self::connect`].
pub struct HcsPsu<S: embedded_io::Read + embedded_io::Write, const L: usize = 32> {
    interface: S,
    profile: DeviceProfile,
    /// Ratings reported by `GMAX`, or [`UNLIMITED`] in blind mode.
    maximum: Limits,
    soft_limit: Limits,
}

impl<S: embedded_io::Read + embedded_io::Write, const L: usize> HcsPsu<S, L> {
    /// Open a session with the PSU on `interface`.
    ///
    /// Unless the config is blind, this asks the device for its ratings. Soft limits left unset default to the
    /// device maximum. A soft limit outside `0..=maximum` fails with [`Error::InvalidConfiguration`].
    pub fn connect(interface: S, config: SessionConfig) -> Result<Self, S::Error> {
        let mut psu = Self {
            interface,
            profile: config.profile,
            maximum: Limits::new(UNLIMITED, UNLIMITED),
            soft_limit: Limits::new(UNLIMITED, UNLIMITED),
        };

        if config.blind {
            log::debug!("{}: blind mode, not querying ratings", psu.profile.name);
        } else {
            let (voltage, current) = psu.get_capability_limits()?;
            psu.maximum = Limits::new(voltage, current);
        }

        for quantity in Quantity::iter() {
            let minimum = psu.profile.minimum.get(quantity);
            let maximum = psu.maximum.get(quantity);
            if maximum < minimum {
                log::error!(
                    "{}: reported maximum {} {} is below the device minimum {}",
                    psu.profile.name,
                    quantity,
                    maximum,
                    minimum
                );
                return Err(Error::InvalidResponse);
            }
        }

        psu.soft_limit = Limits::new(
            resolve_limit(Quantity::Voltage, config.voltage_limit, psu.maximum.voltage)?,
            resolve_limit(Quantity::Current, config.current_limit, psu.maximum.current)?,
        );

        log::debug!(
            "{}: connected, maximum {:?}, soft limit {:?}",
            psu.profile.name,
            psu.maximum,
            psu.soft_limit
        );
        Ok(psu)
    }

    /// End the session and hand back the interface.
    ///
    /// The interface is flushed first. If that fails the interface is dropped with the session.
    pub fn close(mut self) -> Result<S, S::Error> {
        self.interface.flush().map_err(Error::SerialError)?;
        log::debug!("{}: session closed", self.profile.name);
        Ok(self.interface)
    }

    /// The model parameters this session was opened with.
    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    /// Device ratings as resolved when connecting.
    pub fn maximum(&self) -> Limits {
        self.maximum
    }

    /// Highest values [`Self::set_voltage`] and [`Self::set_current`] accept.
    pub fn soft_limit(&self) -> Limits {
        self.soft_limit
    }

    /// Ask the device for its maximum voltage (volts) and current (amps).
    pub fn get_capability_limits(&mut self) -> Result<(f32, f32), S::Error> {
        let response = self.exchange(&Request::new(Command::GetMax))?;
        let payload = codec::decode_response(&response)?;
        Ok(codec::decode_quantities(payload, &self.profile.set_decimals)?)
    }

    /// Get the preset voltage (volts) and current (amps).
    pub fn get_preset(&mut self) -> Result<(f32, f32), S::Error> {
        let response = self.exchange(&Request::new(Command::GetPreset))?;
        let payload = codec::decode_response(&response)?;
        Ok(codec::decode_quantities(payload, &self.profile.set_decimals)?)
    }

    /// Read the voltage and current on the display and whether the supply is in CC or CV mode.
    pub fn get_display(&mut self) -> Result<(f32, f32, ControlMode), S::Error> {
        let response = self.exchange(&Request::new(Command::GetDisplay))?;
        let payload = codec::decode_response(&response)?;
        Ok(codec::decode_display(
            payload,
            &self.profile.display_decimals,
            self.profile.display_order,
        )?)
    }

    /// Set the output target voltage in volts.
    ///
    /// Must be above zero and no more than the voltage soft limit. Values below the device minimum are raised to it.
    pub fn set_voltage(&mut self, volts: f32) -> Result<(), S::Error> {
        self.set_quantity(Quantity::Voltage, volts)
    }

    /// Set the output current limit in amps.
    ///
    /// Must be above zero and no more than the current soft limit. Values below the device minimum are raised to it.
    pub fn set_current(&mut self, amps: f32) -> Result<(), S::Error> {
        self.set_quantity(Quantity::Current, amps)
    }

    /// Enable/disable the output.
    pub fn set_output(&mut self, state: impl Into<State>) -> Result<(), S::Error> {
        let request = codec::encode_output(state.into(), &self.profile.output_polarity);
        self.command(&request)
    }

    /// Enable the output.
    pub fn enable(&mut self) -> Result<(), S::Error> {
        self.set_output(State::On)
    }

    /// Disable the output.
    pub fn disable(&mut self) -> Result<(), S::Error> {
        self.set_output(State::Off)
    }

    fn set_quantity(&mut self, quantity: Quantity, value: f32) -> Result<(), S::Error> {
        if value.is_nan() || value <= 0.0 {
            return Err(RangeError::NegativeOrZero(quantity).into());
        }
        let limit = self.soft_limit.get(quantity);
        let minimum = self.profile.minimum.get(quantity);

        let clamped = if value < minimum {
            log::warn!(
                "{}: {} {} is below the device minimum, using {}",
                self.profile.name,
                quantity,
                value,
                minimum
            );
            minimum
        } else {
            value
        };
        // The clamped value is checked too, as the soft limit may sit below the device minimum. The error still
        // reports what the caller asked for.
        if clamped > limit {
            return Err(RangeError::OverLimit {
                quantity,
                value,
                limit,
            }
            .into());
        }

        let request = codec::encode_set(quantity, clamped, &self.profile.set_decimals)?;
        self.command(&request)
    }

    /// Send a command which is answered with a bare acknowledgement.
    fn command(&mut self, request: &Request) -> Result<(), S::Error> {
        let response = self.exchange(request)?;
        codec::decode_response(&response)?;
        Ok(())
    }

    /// Write one request and read back its raw response.
    fn exchange(&mut self, request: &Request) -> Result<heapless::Vec<u8, L>, S::Error> {
        let frame = request.to_frame();
        log::trace!("tx {:?}", core::str::from_utf8(&frame).unwrap_or("<non-ascii>"));

        self.interface
            .write_all(&frame)
            .map_err(Error::SerialError)?;
        self.interface.flush().map_err(Error::SerialError)?;

        let response = self.read_response()?;
        log::trace!("rx {:?}", core::str::from_utf8(&response).unwrap_or("<non-ascii>"));
        if response.is_empty() {
            log::warn!("{}: no response to {:?}", self.profile.name, request.command());
        }
        Ok(response)
    }

    /// Read until the acknowledgement marker, or until the interface times out.
    fn read_response(&mut self) -> Result<heapless::Vec<u8, L>, S::Error> {
        let mut buff: heapless::Vec<u8, L> = heapless::Vec::new();
        // Single bytes, so nothing past the marker is consumed.
        let mut byte = [0u8; 1];
        loop {
            match self.interface.read(&mut byte) {
                Ok(0) => break,
                Ok(_) => {
                    buff.push(byte[0]).map_err(|_| Error::BufferError)?;
                    if buff.ends_with(RESPONSE_END) {
                        break;
                    }
                }
                // A timed out read ends the wait for the marker. Any other error is a transport fault.
                Err(e) if matches!(e.kind(), ErrorKind::TimedOut) => break,
                Err(e) => return Err(Error::SerialError(e)),
            }
        }
        Ok(buff)
    }
}

fn resolve_limit<I: embedded_io::Error>(
    quantity: Quantity,
    requested: Option<f32>,
    maximum: f32,
) -> Result<f32, I> {
    let limit = requested.unwrap_or(maximum);
    if !(0.0..=maximum).contains(&limit) {
        return Err(Error::InvalidConfiguration {
            quantity,
            limit,
            maximum,
        });
    }
    Ok(limit)
}
