use std::env;

use hcs_psu::{
    config::SessionConfig,
    profile::HCS_3202,
    psu::{BAUD_RATE, HcsPsu, RESPONSE_TIMEOUT},
};
use inquire::Select;
use serialport::SerialPort;

// Configuration constants - adjust these for your setup
const VOLTAGE_LIMIT: f32 = 15.0;
const CURRENT_LIMIT: f32 = 1.0;
const OUTPUT_VOLTAGE: f32 = 5.5;
const OUTPUT_CURRENT: f32 = 0.1;
const STABILIZATION_DELAY_MS: u64 = 1000;

pub struct PortWrapper(Box<dyn SerialPort>);

#[derive(Debug)]
pub struct IoError(std::io::Error);

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl embedded_io::Error for IoError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self.0.kind() {
            std::io::ErrorKind::NotFound => embedded_io::ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => embedded_io::ErrorKind::PermissionDenied,
            std::io::ErrorKind::BrokenPipe => embedded_io::ErrorKind::BrokenPipe,
            std::io::ErrorKind::InvalidInput => embedded_io::ErrorKind::InvalidInput,
            std::io::ErrorKind::InvalidData => embedded_io::ErrorKind::InvalidData,
            // This is how the serial port reports that no byte arrived within its timeout.
            std::io::ErrorKind::TimedOut => embedded_io::ErrorKind::TimedOut,
            std::io::ErrorKind::Interrupted => embedded_io::ErrorKind::Interrupted,
            std::io::ErrorKind::Unsupported => embedded_io::ErrorKind::Unsupported,
            _ => embedded_io::ErrorKind::Other,
        }
    }
}

impl embedded_io::ErrorType for PortWrapper {
    type Error = IoError;
}

impl embedded_io::Read for PortWrapper {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        std::io::Read::read(&mut self.0, buf).map_err(IoError)
    }
}

impl embedded_io::Write for PortWrapper {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        std::io::Write::write(&mut self.0, buf).map_err(IoError)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        std::io::Write::flush(&mut self.0).map_err(IoError)
    }
}

fn main() {
    env_logger::init();

    // Get serial port from command line arg or interactive selection
    let port_name = env::args().nth(1).unwrap_or_else(|| {
        let ports = serialport::available_ports().expect("Failed to enumerate serial ports");

        if ports.is_empty() {
            eprintln!("No serial ports found!");
            std::process::exit(1);
        }

        let port_names: Vec<String> = ports.iter().map(|p| p.port_name.clone()).collect();

        Select::new("Select a serial port:", port_names)
            .prompt()
            .expect("Failed to select port")
    });

    println!("Using port: {}", port_name);

    let port = serialport::new(&port_name, BAUD_RATE)
        .timeout(std::time::Duration::from_millis(
            RESPONSE_TIMEOUT.to_millis() as u64,
        ))
        .open()
        .expect("Failed to open serial port");

    let config = SessionConfig::new(HCS_3202)
        .with_voltage_limit(VOLTAGE_LIMIT)
        .with_current_limit(CURRENT_LIMIT);
    let mut psu: HcsPsu<PortWrapper> =
        HcsPsu::connect(PortWrapper(port), config).expect("Failed to connect to PSU");

    let maximum = psu.maximum();
    println!(
        "{} rated for {}V / {}A",
        psu.profile().name,
        maximum.voltage,
        maximum.current
    );

    psu.set_voltage(OUTPUT_VOLTAGE).unwrap();
    psu.set_current(OUTPUT_CURRENT).unwrap();

    let (voltage, current) = psu.get_preset().unwrap();
    println!("Preset: {}V / {}A", voltage, current);

    psu.enable().unwrap();
    println!("Output enabled");

    // Wait for output to stabilize
    std::thread::sleep(std::time::Duration::from_millis(STABILIZATION_DELAY_MS));

    let (voltage, current, mode) = psu.get_display().unwrap();
    println!("Measured: {:.2}V / {:.2}A in {:?} mode", voltage, current, mode);

    // Above the soft limit, refused before anything is sent.
    match psu.set_voltage(VOLTAGE_LIMIT + 1.0) {
        Err(err) => println!("Refused as expected: {}", err),
        Ok(()) => println!("Soft limit was not enforced!"),
    }

    psu.disable().unwrap();
    println!("Output disabled");

    psu.close().expect("Failed to flush serial port");
}
