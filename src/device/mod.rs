pub mod handshake;
pub mod link;
pub mod locator;

use anyhow::Context;
use serialport::{DataBits, Parity, SerialPort, StopBits};
use std::time::Duration;

pub const BAUD_RATE: u32 = 115_200;
/// Kept well below the handshake budget; it also paces the control loop.
pub const READ_TIMEOUT: Duration = Duration::from_millis(100);

pub fn open_serial(path: &str) -> anyhow::Result<link::SerialLink<Box<dyn SerialPort>>> {
    let port = serialport::new(path, BAUD_RATE)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .timeout(READ_TIMEOUT)
        .open()
        .with_context(|| format!("cannot open serial port {path}"))?;
    Ok(link::SerialLink::new(port))
}
