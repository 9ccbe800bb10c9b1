//! Where landing events come from: a live serial feed from the host, or a
//! recorded flight replayed from a file.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};

use crate::constants::{MAX_LINE_BYTES, SERIAL_READ_TIMEOUT_MILLIS};
use crate::error::LandingError;
use crate::events::{LandingEvent, TimedEvent};
use crate::timer::Millis;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourcePoll {
    Event(TimedEvent),
    /// Nothing arrived before the read timeout.
    Idle,
    Finished,
}

pub trait EventSource {
    /// Returns the next event, if any. `now` stamps events that carry no timestamp of their own.
    fn poll(&mut self, now: Millis) -> Result<SourcePoll, LandingError>;
}

/// Untimestamped `<name>,<value>` lines from a byte stream, stamped on arrival.
pub struct LineSource<R> {
    reader: R,
    pending: Vec<u8>,
    finished: bool,
}

impl<R: Read> LineSource<R> {
    pub fn new(reader: R) -> Self {
        LineSource {
            reader,
            pending: Vec::new(),
            finished: false,
        }
    }

    fn take_line(&mut self) -> Option<String> {
        let end = self.pending.iter().position(|b| *b == b'\n')?;
        let line: Vec<u8> = self.pending.drain(..=end).collect();
        Some(String::from_utf8_lossy(&line).trim().to_string())
    }
}

impl<R: Read> EventSource for LineSource<R> {
    fn poll(&mut self, now: Millis) -> Result<SourcePoll, LandingError> {
        loop {
            if let Some(line) = self.take_line() {
                if line.is_empty() {
                    continue;
                }
                let event: LandingEvent = line.parse()?;
                return Ok(SourcePoll::Event(TimedEvent { at: now, event }));
            }
            if self.finished {
                return Ok(SourcePoll::Finished);
            }

            let mut buffer = [0u8; 256];
            match self.reader.read(&mut buffer) {
                Ok(0) => {
                    self.finished = true;
                    // A final line without terminator still counts.
                    if !self.pending.is_empty() {
                        self.pending.push(b'\n');
                    }
                }
                Ok(read) => {
                    self.pending.extend_from_slice(&buffer[..read]);
                    if self.pending.len() > MAX_LINE_BYTES
                        && !self.pending.contains(&b'\n')
                    {
                        let dropped = self.pending.len();
                        self.pending.clear();
                        warn!(dropped, "no line terminator within {} bytes, discarding", MAX_LINE_BYTES);
                        return Err(LandingError::parse(
                            "",
                            format!("line longer than {MAX_LINE_BYTES} bytes"),
                        ));
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::TimedOut => return Ok(SourcePoll::Idle),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }
}

pub type SerialSource = LineSource<Box<dyn serialport::SerialPort>>;

impl SerialSource {
    pub fn open(path: &str, baud: u32) -> Result<Self, LandingError> {
        let port = serialport::new(path, baud)
            .timeout(Duration::from_millis(SERIAL_READ_TIMEOUT_MILLIS))
            .open()?;
        info!(path, baud, "listening for host events");
        Ok(LineSource::new(port))
    }
}

/// Timestamped `<t_ms>,<name>,<value>` lines from a recorded flight.
///
/// Blank lines and lines starting with `#` are skipped.
pub struct ReplaySource<R> {
    lines: io::Lines<R>,
}

impl<R: BufRead> ReplaySource<R> {
    pub fn new(reader: R) -> Self {
        ReplaySource {
            lines: reader.lines(),
        }
    }
}

impl ReplaySource<BufReader<File>> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LandingError> {
        let file = File::open(path.as_ref())?;
        info!(path = %path.as_ref().display(), "replaying recorded flight");
        Ok(ReplaySource::new(BufReader::new(file)))
    }
}

impl<R: BufRead> EventSource for ReplaySource<R> {
    fn poll(&mut self, _now: Millis) -> Result<SourcePoll, LandingError> {
        for line in self.lines.by_ref() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            return Ok(SourcePoll::Event(trimmed.parse()?));
        }
        Ok(SourcePoll::Finished)
    }
}
