use std::fs;
use std::io::Cursor;

use touchdown::context::Context;
use touchdown::logger::FlightLogger;
use touchdown::source::ReplaySource;
use touchdown::{Classifier, FlightState, LandingConfig, StatusText};

fn replay_str(recording: &'static str) -> Context {
    let source = ReplaySource::new(Cursor::new(recording));
    Context::new(LandingConfig::default(), Box::new(source), None, None)
}

#[test]
fn test_recorded_go_around() {
    let source = ReplaySource::from_path("tests/data/two_bounces.txt").unwrap();
    let log_path = std::env::temp_dir().join(format!("touchdown-scenario-{}.csv", std::process::id()));
    let logger = FlightLogger::create_at(log_path.clone()).unwrap();
    let mut context = Context::new(LandingConfig::default(), Box::new(source), Some(logger), None);

    let mut bounces_before_drain = None;
    while context.update(0).unwrap() {
        if context.classifier.state() == FlightState::Bouncing {
            bounces_before_drain = Some(context.classifier.bounce_count());
        }
    }
    assert_eq!(bounces_before_drain, Some(2));

    // The flying timer armed at 2500 settles the replay in Flying.
    assert_eq!(context.classifier.state(), FlightState::Flying);
    assert_eq!(context.classifier.status(), StatusText::Flying);
    assert_eq!(context.classifier.bounce_count(), 0);
    // Peak g shows the most recent touchdown window.
    assert_eq!(context.classifier.max_g(), 1.4);

    drop(context);
    let log = fs::read_to_string(&log_path).unwrap();
    let last = log.lines().last().unwrap();
    assert_eq!(last, "12500,timer,,Flying,FLYING,0,1.40");
    let _ = fs::remove_file(log_path);
}

#[test]
fn test_first_touch_peak_excludes_late_spike() {
    let mut context = replay_str(
        "0,on_ground,0\n900,gforce,1.1\n1000,on_ground,1\n1050,gforce,1.8\n1100,gforce,2.3\n1150,gforce,1.6\n1200,gforce,3.9\n",
    );
    while context.update(0).unwrap() {}
    assert_eq!(context.classifier.state(), FlightState::Landed);
    assert_eq!(context.classifier.max_g(), 2.3);
}

#[test]
fn test_liftoff_before_bounce_time_counts_one_bounce() {
    let mut classifier = Classifier::new(LandingConfig::default());
    classifier.on_ground_changed(false, 0);
    classifier.on_ground_changed(true, 10_000);
    classifier.on_ground_changed(false, 12_999);
    assert_eq!(classifier.state(), FlightState::Bouncing);
    assert_eq!(classifier.status(), StatusText::Landing);
    assert_eq!(classifier.bounce_count(), 1);
}

#[test]
fn test_rebound_after_landing_is_flight() {
    let mut classifier = Classifier::new(LandingConfig::default());
    classifier.on_ground_changed(true, 0);
    assert_eq!(classifier.state(), FlightState::Landed);
    classifier.on_ground_changed(false, 100);
    assert_eq!(classifier.state(), FlightState::Flying);
    assert_eq!(classifier.bounce_count(), 0);
    assert_eq!(classifier.next_deadline(), None);
}

#[test]
fn test_custom_bounce_time() {
    let config = LandingConfig {
        bounce_time_ms: 500,
        ..LandingConfig::default()
    };
    let mut classifier = Classifier::new(config);
    classifier.on_ground_changed(false, 0);
    classifier.on_ground_changed(true, 1_000);
    assert_eq!(classifier.poll_timer(1_500), Some(1_500));
    assert_eq!(classifier.state(), FlightState::Landed);
}
