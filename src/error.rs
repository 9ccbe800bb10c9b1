//! Error types for the classifier and its event plumbing, using `thiserror`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LandingError {
    /// A raw state code outside the five flight states
    #[error("Invalid flight state code {0}")]
    InvalidState(u8),

    /// An event line that could not be decoded
    #[error("Malformed event line {line:?}: {reason}")]
    Parse {
        /// Offending line, without its terminator
        line: String,
        /// What was wrong with it
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

impl LandingError {
    pub(crate) fn parse(line: &str, reason: impl Into<String>) -> Self {
        LandingError::Parse {
            line: line.to_string(),
            reason: reason.into(),
        }
    }
}
