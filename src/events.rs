//! Events delivered by the host and the line format they travel in.
//!
//! A line is `<name>,<value>`, e.g. `on_ground,1` or `gforce,1.37`. Recorded
//! flights prefix it with a millisecond timestamp: `1500,on_ground,0`.

use std::fmt;
use std::str::FromStr;

use crate::error::LandingError;
use crate::timer::Millis;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LandingEvent {
    OnGround(bool),
    GForce(f64),
    /// Raw state code, used by recorded scenarios to start from a given state.
    Seed(u8),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedEvent {
    pub at: Millis,
    pub event: LandingEvent,
}

impl LandingEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LandingEvent::OnGround(_) => "on_ground",
            LandingEvent::GForce(_) => "gforce",
            LandingEvent::Seed(_) => "state",
        }
    }

    /// The value field as it appears on the wire.
    pub fn value(&self) -> String {
        match self {
            LandingEvent::OnGround(on_ground) => (*on_ground as u8).to_string(),
            LandingEvent::GForce(value) => value.to_string(),
            LandingEvent::Seed(code) => code.to_string(),
        }
    }
}

impl fmt::Display for LandingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.name(), self.value())
    }
}

impl FromStr for LandingEvent {
    type Err = LandingError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (name, value) = line
            .trim()
            .split_once(',')
            .ok_or_else(|| LandingError::parse(line, "expected <name>,<value>"))?;
        let value = value.trim();

        match name.trim() {
            "on_ground" => match value {
                "1" | "true" => Ok(LandingEvent::OnGround(true)),
                "0" | "false" => Ok(LandingEvent::OnGround(false)),
                _ => Err(LandingError::parse(line, "on_ground must be 0/1/true/false")),
            },
            "gforce" => {
                let g: f64 = value
                    .parse()
                    .map_err(|e| LandingError::parse(line, format!("bad gforce: {e}")))?;
                if !g.is_finite() || g < 0.0 {
                    return Err(LandingError::parse(line, "gforce must be a finite magnitude"));
                }
                Ok(LandingEvent::GForce(g))
            }
            "state" => value
                .parse()
                .map(LandingEvent::Seed)
                .map_err(|e| LandingError::parse(line, format!("bad state code: {e}"))),
            other => Err(LandingError::parse(line, format!("unknown event {other:?}"))),
        }
    }
}

impl FromStr for TimedEvent {
    type Err = LandingError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (at, rest) = line
            .trim()
            .split_once(',')
            .ok_or_else(|| LandingError::parse(line, "expected <t_ms>,<name>,<value>"))?;
        let at = at
            .trim()
            .parse()
            .map_err(|e| LandingError::parse(line, format!("bad timestamp: {e}")))?;
        Ok(TimedEvent {
            at,
            event: rest.parse()?,
        })
    }
}

/// Delivery guarantees of the host's subscription: ground contact only when it
/// changes, g-force quantised and only when the quantised value changes.
#[derive(Debug)]
pub struct EventFilter {
    last_on_ground: Option<bool>,
    last_gforce: Option<f64>,
    scale: f64,
}

impl EventFilter {
    pub fn new(precision: u32) -> Self {
        EventFilter {
            last_on_ground: None,
            last_gforce: None,
            scale: 10f64.powi(precision as i32),
        }
    }

    pub fn accept(&mut self, event: LandingEvent) -> Option<LandingEvent> {
        match event {
            LandingEvent::OnGround(on_ground) => {
                if self.last_on_ground == Some(on_ground) {
                    return None;
                }
                self.last_on_ground = Some(on_ground);
                Some(event)
            }
            LandingEvent::GForce(value) => {
                let quantised = (value * self.scale).round() / self.scale;
                if self.last_gforce == Some(quantised) {
                    return None;
                }
                self.last_gforce = Some(quantised);
                Some(LandingEvent::GForce(quantised))
            }
            LandingEvent::Seed(_) => Some(event),
        }
    }
}
