//! Touchdown, bounce and landing classification from a ground contact signal and
//! g-force samples.

pub mod classifier;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod events;
pub mod logger;
pub mod peak_g;
pub mod source;
pub mod state;
pub mod subject;
pub mod timer;
pub mod transmitter;

pub use classifier::{Classifier, LandingOutputs};
pub use config::LandingConfig;
pub use error::LandingError;
pub use state::{FlightState, StatusText};
