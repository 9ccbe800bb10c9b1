use tracing::{debug, info, warn};

use crate::{
    classifier::Classifier,
    config::LandingConfig,
    constants::TRANSMIT_INTERVAL_MILLIS,
    error::LandingError,
    events::{EventFilter, LandingEvent, TimedEvent},
    logger::FlightLogger,
    source::{EventSource, SourcePoll},
    timer::Millis,
    transmitter::{StatusPacket, Transmitter},
};

pub struct Context {
    pub classifier: Classifier,
    filter: EventFilter,
    source: Box<dyn EventSource>,
    logger: Option<FlightLogger>,
    transmitter: Option<Transmitter>,
    last_transmit: Option<Millis>,
}

impl Context {
    pub fn new(
        config: LandingConfig,
        source: Box<dyn EventSource>,
        logger: Option<FlightLogger>,
        transmitter: Option<Transmitter>,
    ) -> Self {
        let mut classifier = Classifier::new(config);
        let outputs = classifier.outputs_mut();
        outputs.status.sub(|status| info!(%status, "status"));
        outputs.bounces.sub(|bounces| info!(bounces, "bounces"));
        outputs.max_g.sub(|max_g| info!(max_g, "peak g"));

        Context {
            classifier,
            filter: EventFilter::new(config.g_precision),
            source,
            logger,
            transmitter,
            last_transmit: None,
        }
    }

    /// Handles at most one event and any timer that came due. Returns false once the source is exhausted.
    pub fn update(&mut self, now: Millis) -> Result<bool, LandingError> {
        let clock = match self.source.poll(now) {
            Ok(SourcePoll::Event(timed)) => {
                self.fire_due_timers(timed.at);
                self.handle(timed);
                timed.at
            }
            Ok(SourcePoll::Idle) => {
                self.fire_due_timers(now);
                now
            }
            Ok(SourcePoll::Finished) => {
                self.drain();
                return Ok(false);
            }
            Err(e @ LandingError::Parse { .. }) => {
                warn!("Skipping event: {}", e);
                return Ok(true);
            }
            Err(e) => return Err(e),
        };

        self.maybe_transmit(clock);
        Ok(true)
    }

    /// Fires the pending timer, if any, at its own deadline so the final state is settled.
    pub fn drain(&mut self) {
        if let Some(deadline) = self.classifier.next_deadline() {
            self.fire_due_timers(deadline);
        }
        self.maybe_transmit(Millis::MAX);
        if let Some(logger) = &mut self.logger {
            if let Err(e) = logger.flush() {
                warn!("Failed to flush log file: {}", e);
            }
        }
    }

    fn handle(&mut self, timed: TimedEvent) {
        let Some(event) = self.filter.accept(timed.event) else {
            return;
        };

        match event {
            LandingEvent::OnGround(on_ground) => {
                self.classifier.on_ground_changed(on_ground, timed.at)
            }
            LandingEvent::GForce(value) => self.classifier.on_gforce_sample(value, timed.at),
            LandingEvent::Seed(code) => {
                if let Err(e) = self.classifier.seed_state(code, timed.at) {
                    debug!("Seed ignored: {}", e);
                }
            }
        }

        if let Some(logger) = &mut self.logger {
            logger.log_row(timed.at, event.name(), &event.value(), &self.classifier);
        }
    }

    fn fire_due_timers(&mut self, now: Millis) {
        while let Some(deadline) = self.classifier.poll_timer(now) {
            if let Some(logger) = &mut self.logger {
                logger.log_row(deadline, "timer", "", &self.classifier);
            }
        }
    }

    fn maybe_transmit(&mut self, now: Millis) {
        let Some(transmitter) = &mut self.transmitter else {
            return;
        };
        let should_transmit = match self.last_transmit {
            Some(last) => now.saturating_sub(last) >= TRANSMIT_INTERVAL_MILLIS,
            None => true,
        };

        if should_transmit {
            transmitter.transmit(&StatusPacket {
                status: self.classifier.status(),
                bounces: self.classifier.bounce_count(),
                max_g: self.classifier.max_g(),
            });
            self.last_transmit = Some(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ReplaySource;
    use crate::state::{FlightState, StatusText};
    use std::io::Cursor;

    fn replay(recording: &'static str) -> Context {
        let source = ReplaySource::new(Cursor::new(recording));
        Context::new(LandingConfig::default(), Box::new(source), None, None)
    }

    fn run(context: &mut Context) {
        while context.update(0).unwrap() {}
    }

    #[test]
    fn test_replay_settles_pending_timer() {
        let mut context = replay("0,on_ground,0\n1000,on_ground,1\n");
        run(&mut context);
        assert_eq!(context.classifier.state(), FlightState::Landed);
        assert_eq!(context.classifier.status(), StatusText::OnGround);
    }

    #[test]
    fn test_timer_fires_between_events() {
        // The bounce timer expires at 4000, before lift-off at 6000.
        let mut context = replay("0,on_ground,0\n1000,on_ground,1\n6000,on_ground,0\n");
        context.update(0).unwrap();
        context.update(0).unwrap();
        context.update(0).unwrap();
        assert_eq!(context.classifier.state(), FlightState::Flying);
        assert_eq!(context.classifier.bounce_count(), 0);
    }

    #[test]
    fn test_duplicate_ground_events_are_filtered() {
        let mut context = replay("0,on_ground,0\n1000,on_ground,1\n1500,on_ground,1\n2000,on_ground,0\n");
        for _ in 0..4 {
            context.update(0).unwrap();
        }
        assert_eq!(context.classifier.state(), FlightState::Bouncing);
        assert_eq!(context.classifier.bounce_count(), 1);
    }

    #[test]
    fn test_bad_lines_and_codes_are_skipped() {
        let mut context = replay("0,state,4\n10,nonsense\n20,state,42\n1000,on_ground,1\n");
        run(&mut context);
        assert_eq!(context.classifier.state(), FlightState::Landed);
    }

    #[test]
    fn test_seeded_state_ignores_earlier_touch_timer() {
        let mut context = replay("0,on_ground,0
0,on_ground,1
100,state,2
200,on_ground,0
");
        for _ in 0..4 {
            context.update(0).unwrap();
        }
        assert_eq!(context.classifier.next_deadline(), Some(10_100));
        run(&mut context);
        assert_eq!(context.classifier.state(), FlightState::Flying);

        let mut context = replay("0,on_ground,0
0,on_ground,1
100,state,2
200,on_ground,0
5000,gforce,1.0
");
        for _ in 0..5 {
            context.update(0).unwrap();
        }
        assert_eq!(context.classifier.state(), FlightState::Bouncing);
    }
}
