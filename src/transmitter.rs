//! Sends the published outputs to the display over a serial link.

use std::fmt;
use std::io::Write;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::LandingError;
use crate::state::StatusText;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusPacket {
    pub status: StatusText,
    pub bounces: u32,
    pub max_g: f64,
}

impl fmt::Display for StatusPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{:.2}", self.status, self.bounces, self.max_g)
    }
}

pub struct Transmitter {
    port: Box<dyn serialport::SerialPort>,
}

impl Transmitter {
    pub fn open(path: &str, baud: u32) -> Result<Self, LandingError> {
        let port = serialport::new(path, baud)
            .timeout(Duration::from_millis(1000))
            .open()?;
        info!(path, baud, "transmitting status");
        Ok(Transmitter { port })
    }

    pub fn transmit(&mut self, packet: &StatusPacket) {
        let output = format!("{packet}\n");
        if let Err(e) = self.port.write_all(output.as_bytes()) {
            warn!("Failed to write to port for transmission: {}", e);
        }
    }
}
