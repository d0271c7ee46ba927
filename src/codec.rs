//! Encoding of commands into wire frames and decoding of the PSU responses.
//!
//! Numeric fields on the wire are fixed width, zero padded ASCII decimals. A quantity with `d` decimals occupies
//! `d + 2` digits holding the value scaled by `10^d`. E.g. 12.3V with one decimal => `123`.

use core::fmt::Write;

use crate::{
    command::{CR, Command, MNEMONIC_LEN, RESPONSE_END},
    error::CodecError,
    profile::{DecimalSpec, FieldOrder, OutputPolarity},
    types::{ControlMode, Quantity, State},
};

/// Longest payload any command carries.
pub const PAYLOAD_CAPACITY: usize = 10;

/// Longest frame we ever send: mnemonic, payload and terminator.
pub const FRAME_CAPACITY: usize = MNEMONIC_LEN + PAYLOAD_CAPACITY + 1;

pub type Payload = heapless::Vec<u8, PAYLOAD_CAPACITY>;
pub type Frame = heapless::Vec<u8, FRAME_CAPACITY>;

/// A logical command plus its (possibly empty) payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    command: Command,
    payload: Payload,
}

impl Request {
    /// A command without a payload. E.g. `GETS`.
    pub fn new(command: Command) -> Self {
        Self {
            command,
            payload: Payload::new(),
        }
    }

    pub fn command(&self) -> Command {
        self.command
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The bytes to write to the interface, carriage return included.
    pub fn to_frame(&self) -> Frame {
        // Payload capacity keeps this within the frame capacity.
        self.command
            .mnemonic()
            .iter()
            .chain(self.payload.iter())
            .chain(core::iter::once(&CR))
            .copied()
            .collect()
    }
}

/// Build the `VOLT`/`CURR` request for a value.
///
/// The value is scaled by `10^decimals`, rounded to the nearest integer and zero padded to `decimals + 2` digits.
/// Values which don't fit that field are refused rather than truncated.
pub fn encode_set(
    quantity: Quantity,
    value: f32,
    decimals: &DecimalSpec,
) -> Result<Request, CodecError> {
    let out_of_range = CodecError::EncodingRange { quantity, value };

    let width = decimals.width(quantity)?;
    let scale = decimals.scale(quantity)?;
    if width > PAYLOAD_CAPACITY || !value.is_finite() || value < 0.0 {
        return Err(out_of_range);
    }

    // Values are non-negative, so adding a half and truncating rounds to nearest.
    let rounded = (value * scale + 0.5) as u64;
    if rounded >= 10u64.pow(width as u32) {
        return Err(out_of_range);
    }

    let mut digits: heapless::String<PAYLOAD_CAPACITY> = heapless::String::new();
    write!(digits, "{:0width$}", rounded, width = width).map_err(|_| out_of_range)?;

    Ok(Request {
        command: Command::set(quantity),
        payload: digits.bytes().collect(),
    })
}

/// Build the `SOUT` request using the model's polarity.
pub fn encode_output(state: State, polarity: &OutputPolarity) -> Request {
    Request {
        command: Command::SetOutput,
        payload: core::iter::once(polarity.byte(state)).collect(),
    }
}

/// Strip the acknowledgement marker from a raw response, returning the payload.
///
/// An empty response means the read timed out without the device accepting the command.
pub fn decode_response(raw: &[u8]) -> Result<&[u8], CodecError> {
    if raw.is_empty() {
        return Err(CodecError::CommandRejected);
    }
    let payload = raw
        .strip_suffix(RESPONSE_END)
        .ok_or(CodecError::InvalidResponse)?;
    // Responses carrying data terminate the data line before the marker.
    Ok(payload.strip_suffix(&[CR]).unwrap_or(payload))
}

/// Split a `GETS`/`GMAX` payload into voltage and current.
///
/// The first field is `2 + decimals.voltage` wide, the remainder is the current field.
pub fn decode_quantities(payload: &[u8], decimals: &DecimalSpec) -> Result<(f32, f32), CodecError> {
    decode_pair(payload, decimals, Quantity::Voltage)
}

/// Decode a `GETD` payload: voltage, current and the control mode flag in the final byte.
pub fn decode_display(
    payload: &[u8],
    decimals: &DecimalSpec,
    order: FieldOrder,
) -> Result<(f32, f32, ControlMode), CodecError> {
    let (flag, fields) = payload.split_last().ok_or(CodecError::InvalidResponse)?;
    let (voltage, current) = match order {
        FieldOrder::VoltageFirst => decode_pair(fields, decimals, Quantity::Voltage)?,
        FieldOrder::CurrentFirst => {
            let (current, voltage) = decode_pair(fields, decimals, Quantity::Current)?;
            (voltage, current)
        }
    };
    Ok((voltage, current, ControlMode::from_flag(*flag)))
}

/// Decode two adjacent fields, `first` sized by its decimals, the other one taking the rest.
fn decode_pair(
    payload: &[u8],
    decimals: &DecimalSpec,
    first: Quantity,
) -> Result<(f32, f32), CodecError> {
    let second = match first {
        Quantity::Voltage => Quantity::Current,
        Quantity::Current => Quantity::Voltage,
    };
    let first_width = decimals.width(first)?;
    let first_scale = decimals.scale(first)?;
    let second_scale = decimals.scale(second)?;

    if payload.len() <= first_width {
        return Err(CodecError::InvalidResponse);
    }
    let (head, tail) = payload.split_at(first_width);
    Ok((parse_field(head, first_scale)?, parse_field(tail, second_scale)?))
}

fn parse_field(field: &[u8], scale: f32) -> Result<f32, CodecError> {
    if field.is_empty() || !field.iter().all(u8::is_ascii_digit) {
        return Err(CodecError::InvalidResponse);
    }
    let raw: u64 = core::str::from_utf8(field)
        .map_err(|_| CodecError::InvalidResponse)?
        .parse()
        .map_err(|_| CodecError::InvalidResponse)?;
    Ok(raw as f32 / scale)
}
