//! Touchdown state machine: the five flight states, their status projection and
//! the transition table.
//!
//! `transition` is pure. It never touches timers or counters itself, it returns
//! the effects the caller has to apply. The bounce count is cleared on every
//! entry into `Flying` and again when a new touchdown starts.

use std::fmt;

use crate::error::LandingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FlightState {
    /// Before the first ground contact signal has been seen.
    Unknown = 0,
    /// On the ground, waiting for the bounce timer to confirm the touchdown.
    Touched = 1,
    /// Airborne again after a touch, waiting for the flying timer.
    Bouncing = 2,
    Landed = 3,
    Flying = 4,
}

/// Text published to the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusText {
    Flying,
    Landing,
    OnGround,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Ground contact needed to confirm a touchdown.
    Bounce,
    /// Time in the air needed to confirm flight after a bounce.
    Flying,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    ArmTimer(TimerKind),
    IncrementBounces,
    ResetBounces,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: FlightState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn stay(state: FlightState) -> Self {
        Transition {
            next: state,
            effects: Vec::new(),
        }
    }

    fn to(next: FlightState, effects: Vec<Effect>) -> Self {
        Transition { next, effects }
    }
}

impl FlightState {
    pub const ALL: [FlightState; 5] = [
        FlightState::Unknown,
        FlightState::Touched,
        FlightState::Bouncing,
        FlightState::Landed,
        FlightState::Flying,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FlightState::Unknown => "Unknown",
            FlightState::Touched => "Touched",
            FlightState::Bouncing => "Bouncing",
            FlightState::Landed => "Landed",
            FlightState::Flying => "Flying",
        }
    }

    pub fn status(&self) -> StatusText {
        match self {
            FlightState::Flying => StatusText::Flying,
            FlightState::Touched | FlightState::Bouncing => StatusText::Landing,
            FlightState::Unknown | FlightState::Landed => StatusText::OnGround,
        }
    }
}

impl TryFrom<u8> for FlightState {
    type Error = LandingError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        FlightState::ALL
            .into_iter()
            .find(|state| *state as u8 == code)
            .ok_or(LandingError::InvalidState(code))
    }
}

impl fmt::Display for FlightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl StatusText {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusText::Flying => "FLYING",
            StatusText::Landing => "LANDING",
            StatusText::OnGround => "ON_GROUND",
        }
    }
}

impl fmt::Display for StatusText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluates the transition table once for the current ground level and timer flag.
pub fn transition(state: FlightState, on_ground: bool, timer_expired: bool) -> Transition {
    match (state, on_ground) {
        (FlightState::Unknown, true) => Transition::to(FlightState::Landed, Vec::new()),
        (FlightState::Unknown, false) => {
            Transition::to(FlightState::Flying, vec![Effect::ResetBounces])
        }

        (FlightState::Touched, true) if timer_expired => {
            Transition::to(FlightState::Landed, Vec::new())
        }
        (FlightState::Touched, true) => Transition::stay(state),
        (FlightState::Touched, false) => Transition::to(
            FlightState::Bouncing,
            vec![
                Effect::IncrementBounces,
                Effect::ArmTimer(TimerKind::Flying),
            ],
        ),

        (FlightState::Bouncing, true) => Transition::to(
            FlightState::Touched,
            vec![Effect::ArmTimer(TimerKind::Bounce)],
        ),
        (FlightState::Bouncing, false) if timer_expired => {
            Transition::to(FlightState::Flying, vec![Effect::ResetBounces])
        }
        (FlightState::Bouncing, false) => Transition::stay(state),

        (FlightState::Landed, false) => {
            Transition::to(FlightState::Flying, vec![Effect::ResetBounces])
        }
        (FlightState::Landed, true) => Transition::stay(state),

        (FlightState::Flying, true) => Transition::to(
            FlightState::Touched,
            vec![Effect::ArmTimer(TimerKind::Bounce), Effect::ResetBounces],
        ),
        (FlightState::Flying, false) => Transition::stay(state),
    }
}
