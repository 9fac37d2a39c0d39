//! Serial link abstraction and dongle discovery.
//!
//! The pump is written against the [`SerialLink`] trait so tests can drive it
//! with an in-memory link; production code hands it the `serialport` handle
//! returned by [`open_dongle`].

use std::io;
use std::time::Duration;

use serialport::{DataBits, Parity, SerialPort, SerialPortType, StopBits};
use tracing::debug;

use crate::error::DriverError;

/// USB vendor id of the XRF dongle (Silicon Labs CP210x bridge).
pub const DONGLE_VID: u16 = 0x10C4;
/// USB product id of the XRF dongle.
pub const DONGLE_PID: u16 = 0xEA60;
/// Baud rate the dongle firmware runs at.
pub const DONGLE_BAUD: u32 = 115_200;

/// Read timeout on the serial port. This bounds each read phase of the pump
/// loop so the write phase is never starved.
const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// A byte-stream link to the dongle.
///
/// A read that times out must return `Ok(0)` or an error of kind
/// [`io::ErrorKind::TimedOut`]/[`io::ErrorKind::WouldBlock`]; the pump treats
/// all three as "no data right now".
pub trait SerialLink: Send {
    /// Read available bytes into `buf`, returning how many were read.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write all of `buf` to the link.
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()>;
}

impl<T: io::Read + io::Write + Send> SerialLink for T {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::Read::read(self, buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        io::Write::write_all(self, buf)
    }
}

/// Open the serial connection to the dongle.
///
/// With `port` given, that device is opened directly; otherwise the serial
/// ports are scanned for the dongle's USB VID:PID. Failure here is fatal to
/// startup - there is nothing the driver can do without its radio.
pub fn open_dongle(port: Option<&str>) -> Result<Box<dyn SerialPort>, DriverError> {
    let name = match port {
        Some(name) => name.to_string(),
        None => find_dongle_port()?,
    };
    debug!("opening serial port {}", name);

    let port = serialport::new(&name, DONGLE_BAUD)
        .timeout(READ_TIMEOUT)
        .data_bits(DataBits::Eight)
        .stop_bits(StopBits::One)
        .parity(Parity::None)
        .open()?;
    Ok(port)
}

/// Scan the system's serial ports for the dongle.
fn find_dongle_port() -> Result<String, DriverError> {
    for info in serialport::available_ports()? {
        if let SerialPortType::UsbPort(usb) = &info.port_type {
            if usb.vid == DONGLE_VID && usb.pid == DONGLE_PID {
                return Ok(info.port_name);
            }
        }
    }
    Err(DriverError::NoDongle)
}
