//! We use this mocking module in unit tests to emulate a serial port.
//!
//! [`MockSerial`] replays canned bytes. [`FakeHcs`] behaves like a PSU: it parses the commands written to it and
//! answers from its own state.

extern crate std;

use std::{format, string::String, vec::Vec};

/// Our mock type used to emulate a serial port.
pub struct MockSerial {
    /// Buffer to store data written to the mock serial port
    write_buffer: heapless::Vec<u8, 256>,
    /// Buffer containing pre-configured response data to be read
    read_buffer: heapless::Vec<u8, 256>,
    /// Current position in the read buffer
    read_position: usize,
    /// Flag to simulate write errors
    should_error_on_write: bool,
    /// Flag to simulate read errors
    should_error_on_read: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum MockSerialError {
    /// Simulated buffer overflow
    #[error("Mock buffer overflow")]
    BufferOverflow,
    /// Generic simulated error for testing
    #[error("Simulated serial fault")]
    SimulatedError,
    /// Would block - no data available
    #[error("No data available")]
    WouldBlock,
}

impl embedded_io::Error for MockSerialError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            MockSerialError::BufferOverflow => embedded_io::ErrorKind::OutOfMemory,
            MockSerialError::SimulatedError => embedded_io::ErrorKind::Other,
            MockSerialError::WouldBlock => embedded_io::ErrorKind::TimedOut,
        }
    }
}

impl embedded_io::ErrorType for MockSerial {
    type Error = MockSerialError;
}

impl embedded_io::Write for MockSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if self.should_error_on_write {
            return Err(MockSerialError::SimulatedError);
        }
        self.write_buffer
            .extend_from_slice(buf)
            .map_err(|_| MockSerialError::BufferOverflow)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if self.should_error_on_write {
            return Err(MockSerialError::SimulatedError);
        }
        Ok(())
    }
}

impl embedded_io::Read for MockSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.should_error_on_read {
            return Err(MockSerialError::SimulatedError);
        }

        if self.read_position >= self.read_buffer.len() {
            return Err(MockSerialError::WouldBlock);
        }

        let available = &self.read_buffer[self.read_position..];
        let bytes_to_read = core::cmp::min(buf.len(), available.len());
        buf[..bytes_to_read].copy_from_slice(&available[..bytes_to_read]);

        self.read_position += bytes_to_read;
        Ok(bytes_to_read)
    }
}

impl MockSerial {
    /// Create a new MockSerial instance with empty buffers
    pub fn new() -> Self {
        Self {
            write_buffer: heapless::Vec::new(),
            read_buffer: heapless::Vec::new(),
            read_position: 0,
            should_error_on_write: false,
            should_error_on_read: false,
        }
    }

    /// Create a MockSerial which will answer with `data`.
    pub fn with_read_data(data: &[u8]) -> Self {
        let mut mock = Self::new();
        mock.push_read_data(data).unwrap();
        mock
    }

    /// Queue more data behind whatever hasn't been read yet.
    pub fn push_read_data(&mut self, data: &[u8]) -> Result<(), MockSerialError> {
        self.read_buffer
            .extend_from_slice(data)
            .map_err(|_| MockSerialError::BufferOverflow)
    }

    /// Get a reference to the data that was written to this mock serial port
    pub fn written_data(&self) -> &[u8] {
        &self.write_buffer
    }

    /// Clear the write buffer
    pub fn clear_written_data(&mut self) {
        self.write_buffer.clear();
    }

    /// Configure whether write operations should fail with an error
    pub fn set_write_error(&mut self, should_error: bool) {
        self.should_error_on_write = should_error;
    }

    /// Configure whether read operations should fail with an error
    pub fn set_read_error(&mut self, should_error: bool) {
        self.should_error_on_read = should_error;
    }
}

/// A simulated HCS-3202 answering on an in-memory serial line.
///
/// Values are stored the way the PSU stores them: as integers in tenths for the preset and hundredths for the
/// display.
pub struct FakeHcs {
    /// Bytes of a command not yet terminated by a carriage return.
    pending: Vec<u8>,
    /// Response bytes waiting to be read.
    outgoing: Vec<u8>,
    /// Every complete command received, without the terminator.
    pub received: Vec<String>,
    pub preset_deci_volts: u32,
    pub preset_deci_amps: u32,
    /// Last `SOUT` payload byte.
    pub output_byte: Option<u8>,
    pub constant_current: bool,
    /// Answer nothing for every command while set.
    pub mute: bool,
}

impl FakeHcs {
    pub const MAX_DECI_VOLTS: u32 = 320;
    pub const MAX_DECI_AMPS: u32 = 200;

    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            outgoing: Vec::new(),
            received: Vec::new(),
            preset_deci_volts: 50,
            preset_deci_amps: 10,
            output_byte: None,
            constant_current: false,
            mute: false,
        }
    }

    fn handle(&mut self, line: &str) {
        self.received.push(String::from(line));
        if self.mute {
            return;
        }
        let (mnemonic, payload) = line.split_at(line.len().min(4));
        let response = match (mnemonic, payload) {
            ("GMAX", "") => format!(
                "{:03}{:03}\rOK\r",
                Self::MAX_DECI_VOLTS,
                Self::MAX_DECI_AMPS
            ),
            ("GETS", "") => format!(
                "{:03}{:03}\rOK\r",
                self.preset_deci_volts, self.preset_deci_amps
            ),
            // The display shows the preset when the output is off, one more decimal than the preset.
            ("GETD", "") => format!(
                "{:04}{:04}{}\rOK\r",
                self.preset_deci_volts * 10,
                self.preset_deci_amps * 10,
                if self.constant_current { '1' } else { '0' }
            ),
            ("VOLT", digits) if digits.len() == 3 => match digits.parse() {
                Ok(value) => {
                    self.preset_deci_volts = value;
                    String::from("OK\r")
                }
                Err(_) => String::new(),
            },
            ("CURR", digits) if digits.len() == 3 => match digits.parse() {
                Ok(value) => {
                    self.preset_deci_amps = value;
                    String::from("OK\r")
                }
                Err(_) => String::new(),
            },
            ("SOUT", "0" | "1") => {
                self.output_byte = payload.bytes().next();
                String::from("OK\r")
            }
            // Unknown commands are ignored, leaving the host to time out.
            _ => String::new(),
        };
        self.outgoing.extend_from_slice(response.as_bytes());
    }
}

impl embedded_io::ErrorType for FakeHcs {
    type Error = MockSerialError;
}

impl embedded_io::Write for FakeHcs {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        for &byte in buf {
            if byte == b'\r' {
                let line = String::from_utf8(core::mem::take(&mut self.pending))
                    .map_err(|_| MockSerialError::SimulatedError)?;
                self.handle(&line);
            } else {
                self.pending.push(byte);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl embedded_io::Read for FakeHcs {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.outgoing.is_empty() {
            return Err(MockSerialError::WouldBlock);
        }
        let bytes_to_read = core::cmp::min(buf.len(), self.outgoing.len());
        buf[..bytes_to_read].copy_from_slice(&self.outgoing[..bytes_to_read]);
        self.outgoing.drain(..bytes_to_read);
        Ok(bytes_to_read)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_io::{Read, Write};

    #[test]
    fn test_write_multiple_times() {
        let mut mock = MockSerial::new();
        mock.write(b"GETS\r").unwrap();
        mock.write(b"GETD\r").unwrap();
        assert_eq!(mock.written_data(), b"GETS\rGETD\r");

        mock.clear_written_data();
        assert!(mock.written_data().is_empty());
    }

    #[test]
    fn test_read_queued_data() {
        let mut mock = MockSerial::with_read_data(b"OK\r");
        mock.push_read_data(b"120050\rOK\r").unwrap();

        let mut buffer = [0u8; 3];
        assert_eq!(mock.read(&mut buffer).unwrap(), 3);
        assert_eq!(&buffer, b"OK\r");

        let mut buffer = [0u8; 16];
        assert_eq!(mock.read(&mut buffer).unwrap(), 10);
        assert_eq!(&buffer[..10], b"120050\rOK\r");

        // Exhausted, so the read times out.
        assert!(matches!(mock.read(&mut buffer), Err(MockSerialError::WouldBlock)));
    }

    #[test]
    fn test_error_flags() {
        let mut mock = MockSerial::with_read_data(b"OK\r");
        mock.set_write_error(true);
        assert!(matches!(mock.write(b"GETS\r"), Err(MockSerialError::SimulatedError)));
        assert!(mock.flush().is_err());
        assert!(mock.written_data().is_empty());

        mock.set_read_error(true);
        let mut buffer = [0u8; 4];
        assert!(matches!(mock.read(&mut buffer), Err(MockSerialError::SimulatedError)));
        mock.set_read_error(false);
        assert!(mock.read(&mut buffer).is_ok());
    }

    #[test]
    fn test_error_kinds() {
        use embedded_io::{Error as _, ErrorKind};
        use std::string::ToString;

        assert_eq!(MockSerialError::BufferOverflow.kind(), ErrorKind::OutOfMemory);
        assert_eq!(MockSerialError::SimulatedError.kind(), ErrorKind::Other);
        assert_eq!(MockSerialError::WouldBlock.kind(), ErrorKind::TimedOut);
        assert_eq!(MockSerialError::SimulatedError.to_string(), "Simulated serial fault");
    }

    #[test]
    fn test_fake_hcs_answers() {
        let mut fake = FakeHcs::new();
        fake.write(b"VOLT120\r").unwrap();
        fake.write(b"GE").unwrap();
        fake.write(b"TS\r").unwrap();

        let mut buffer = [0u8; 32];
        let read = fake.read(&mut buffer).unwrap();
        assert_eq!(&buffer[..read], b"OK\r120010\rOK\r");
        assert_eq!(fake.received, ["VOLT120", "GETS"]);
    }

    #[test]
    fn test_fake_hcs_ignores_unknown() {
        let mut fake = FakeHcs::new();
        fake.write(b"VOLT12\r").unwrap();
        fake.write(b"HELP\r").unwrap();

        let mut buffer = [0u8; 8];
        assert!(fake.read(&mut buffer).is_err());
        assert_eq!(fake.preset_deci_volts, 50);
    }
}
