//! The touchdown classifier: drives the state machine from the ground signal and
//! its timer, feeds the peak-g tracker, and publishes the three outputs.

use tracing::{debug, error, info};

use crate::config::LandingConfig;
use crate::error::LandingError;
use crate::peak_g::PeakGTracker;
use crate::state::{Effect, FlightState, StatusText, TimerKind, transition};
use crate::subject::Subject;
use crate::timer::{Millis, Timer, TimerToken};

/// Values read by the display.
#[derive(Debug)]
pub struct LandingOutputs {
    pub status: Subject<StatusText>,
    pub bounces: Subject<u32>,
    pub max_g: Subject<f64>,
}

impl Default for LandingOutputs {
    fn default() -> Self {
        LandingOutputs {
            status: Subject::new(StatusText::OnGround),
            bounces: Subject::new(0),
            max_g: Subject::new(0.0),
        }
    }
}

pub struct Classifier {
    config: LandingConfig,
    state: FlightState,
    on_ground: bool,
    bounce_count: u32,
    timer: Timer,
    timer_expired: bool,
    tracker: PeakGTracker,
    outputs: LandingOutputs,
}

impl Classifier {
    pub fn new(config: LandingConfig) -> Self {
        Classifier {
            tracker: PeakGTracker::new(&config),
            config,
            state: FlightState::Unknown,
            on_ground: true,
            bounce_count: 0,
            timer: Timer::new(),
            timer_expired: true,
            outputs: LandingOutputs::default(),
        }
    }

    /// Handles a change of the ground contact level.
    pub fn on_ground_changed(&mut self, on_ground: bool, now: Millis) {
        self.on_ground = on_ground;
        if on_ground {
            let max_g = self.tracker.activate();
            self.outputs.max_g.set(max_g);
        } else {
            self.tracker.deactivate();
        }
        self.update_state(now);
    }

    pub fn on_gforce_sample(&mut self, value: f64, now: Millis) {
        if let Some(max_g) = self.tracker.record_sample(value, now) {
            self.outputs.max_g.set(max_g);
        }
    }

    /// Handles a timer expiry. Expiries from a superseded timer are ignored.
    pub fn on_timer_expired(&mut self, token: TimerToken, now: Millis) -> bool {
        if !self.timer.is_current(token) || self.timer_expired {
            debug!(?token, state = %self.state, "ignoring stale timer expiry");
            return false;
        }
        self.timer_expired = true;
        self.update_state(now);
        true
    }

    /// Fires the pending timer if its deadline is due. Returns the deadline that fired.
    pub fn poll_timer(&mut self, now: Millis) -> Option<Millis> {
        let (token, deadline) = self.timer.poll(now)?;
        self.on_timer_expired(token, deadline).then_some(deadline)
    }

    /// Forces the machine into the state with the given raw code.
    ///
    /// An unknown code is reported and the machine keeps its current state.
    /// Any pending timer is replaced by the one the seeded state waits on.
    pub fn seed_state(&mut self, code: u8, now: Millis) -> Result<(), LandingError> {
        let state = FlightState::try_from(code).inspect_err(|e| {
            error!(code, current = %self.state, "{e}");
        })?;
        info!(from = %self.state, to = %state, "seeding state");
        self.state = state;
        match state {
            FlightState::Touched => self.apply(Effect::ArmTimer(TimerKind::Bounce), now),
            FlightState::Bouncing => self.apply(Effect::ArmTimer(TimerKind::Flying), now),
            FlightState::Unknown | FlightState::Landed | FlightState::Flying => {
                self.timer.cancel();
                self.timer_expired = true;
            }
        }
        self.publish();
        Ok(())
    }

    pub fn state(&self) -> FlightState {
        self.state
    }

    pub fn status(&self) -> StatusText {
        self.outputs.status.get()
    }

    pub fn bounce_count(&self) -> u32 {
        self.outputs.bounces.get()
    }

    pub fn max_g(&self) -> f64 {
        self.outputs.max_g.get()
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.timer.deadline()
    }

    pub fn tracker(&self) -> &PeakGTracker {
        &self.tracker
    }

    pub fn outputs_mut(&mut self) -> &mut LandingOutputs {
        &mut self.outputs
    }

    fn update_state(&mut self, now: Millis) {
        let step = transition(self.state, self.on_ground, self.timer_expired);
        if step.next != self.state {
            debug!(from = %self.state, to = %step.next, now, "state transition");
        }
        self.state = step.next;
        for effect in step.effects {
            self.apply(effect, now);
        }
        self.publish();
    }

    fn apply(&mut self, effect: Effect, now: Millis) {
        match effect {
            Effect::ArmTimer(kind) => {
                let duration = match kind {
                    TimerKind::Bounce => self.config.bounce_time_ms,
                    TimerKind::Flying => self.config.flying_time_ms,
                };
                self.timer_expired = false;
                self.timer.arm(duration, now);
            }
            Effect::IncrementBounces => self.bounce_count += 1,
            Effect::ResetBounces => self.bounce_count = 0,
        }
    }

    fn publish(&mut self) {
        self.outputs.status.set(self.state.status());
        self.outputs.bounces.set(self.bounce_count);
    }
}
