//! Our error types for the HCS PSUs.

use thiserror::Error;

use crate::types::Quantity;

pub type Result<T, I> = core::result::Result<T, Error<I>>;

/// Custom error type for HCS PSU communications.
#[derive(Error, Debug)]
pub enum Error<I: embedded_io::Error> {
    #[error("Serial communication error")]
    SerialError(I),
    /// No acknowledgement arrived before the read timed out.
    #[error("Command rejected by device")]
    CommandRejected,
    #[error("Invalid response received")]
    InvalidResponse,
    #[error("Invalid range: {0}")]
    Range(RangeError),
    /// The device profile has no decimal count for this quantity.
    #[error("No decimal precision configured for {0}")]
    UnconfiguredDecimals(Quantity),
    #[error("Invalid configuration: {quantity} limit {limit} outside of 0..={maximum}")]
    InvalidConfiguration {
        quantity: Quantity,
        limit: f32,
        maximum: f32,
    },
    #[error("{quantity} value {value} does not fit the wire field")]
    EncodingRange { quantity: Quantity, value: f32 },
    #[error("Response buffer overflow")]
    BufferError,
}

/// A caller supplied value outside of the configured bounds.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum RangeError {
    #[error("Negative or zero {0}")]
    NegativeOrZero(Quantity),
    #[error("Over limit, {quantity} {value} cannot be set within the soft limit of {limit}")]
    OverLimit {
        quantity: Quantity,
        value: f32,
        limit: f32,
    },
}

/// Errors raised by the pure encode/decode functions in [`crate::codec`].
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CodecError {
    #[error("Command rejected by device")]
    CommandRejected,
    #[error("Invalid response received")]
    InvalidResponse,
    #[error("No decimal precision configured for {0}")]
    UnconfiguredDecimals(Quantity),
    #[error("{quantity} value {value} does not fit the wire field")]
    EncodingRange { quantity: Quantity, value: f32 },
}

impl<I: embedded_io::Error> From<CodecError> for Error<I> {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::CommandRejected => Error::CommandRejected,
            CodecError::InvalidResponse => Error::InvalidResponse,
            CodecError::UnconfiguredDecimals(quantity) => Error::UnconfiguredDecimals(quantity),
            CodecError::EncodingRange { quantity, value } => {
                Error::EncodingRange { quantity, value }
            }
        }
    }
}

impl<I: embedded_io::Error> From<RangeError> for Error<I> {
    fn from(err: RangeError) -> Self {
        Error::Range(err)
    }
}
