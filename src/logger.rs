//! This module logs every handled event and the resulting outputs to a file as a csv.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::classifier::Classifier;
use crate::error::LandingError;
use crate::timer::Millis;

pub struct FlightLogger {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl FlightLogger {
    /// Creates `<dir>/YYYY-MM-DD_HH-MM-SS.csv` (UTC) and writes the header.
    pub fn create(dir: &Path) -> Result<Self, LandingError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!(
            "{}.csv",
            chrono::Utc::now().format("%Y-%m-%d_%H-%M-%S")
        ));
        Self::create_at(path)
    }

    pub fn create_at(path: PathBuf) -> Result<Self, LandingError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;

        let mut logger = FlightLogger {
            writer: BufWriter::new(file),
            path,
        };
        logger.write_headers()?;
        info!(path = %logger.path.display(), "flight log opened");
        Ok(logger)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_headers(&mut self) -> io::Result<()> {
        writeln!(self.writer, "t_ms,event,value,state,status,bounces,max_g")
    }

    /// Writes one row. `event` and `value` describe what was just handled.
    pub fn log_row(&mut self, at: Millis, event: &str, value: &str, classifier: &Classifier) {
        if let Err(e) = writeln!(
            self.writer,
            "{},{},{},{},{},{},{:.2}",
            at,
            event,
            value,
            classifier.state(),
            classifier.status(),
            classifier.bounce_count(),
            classifier.max_g()
        ) {
            warn!("Failed to write to log file: {}", e);
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl Drop for FlightLogger {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LandingConfig;

    #[test]
    fn test_rows_follow_header() {
        let dir = std::env::temp_dir().join(format!("touchdown-logger-{}", std::process::id()));
        let mut logger = FlightLogger::create(&dir).unwrap();
        let mut classifier = Classifier::new(LandingConfig::default());
        classifier.on_ground_changed(false, 0);
        logger.log_row(0, "on_ground", "0", &classifier);
        logger.flush().unwrap();

        let contents = fs::read_to_string(logger.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "t_ms,event,value,state,status,bounces,max_g");
        assert_eq!(lines[1], "0,on_ground,0,Flying,FLYING,0,0.00");

        let path = logger.path().to_path_buf();
        drop(logger);
        let _ = fs::remove_file(path);
    }
}
