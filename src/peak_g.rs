//! Peak g-force tracking around ground contact.

use fixed_deque::Deque;
use tracing::{debug, warn};

use crate::config::LandingConfig;
use crate::timer::Millis;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GForceSample {
    pub timestamp: Millis,
    pub value: f64,
}

/// How the sample buffer is managed between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferMode {
    /// No touchdown window open: samples older than the buffer time are dropped.
    Trim,
    /// Touchdown window open: everything is kept and the peak is recomputed
    /// for the next `remaining` samples.
    Retain { remaining: u32 },
}

pub struct PeakGTracker {
    samples: Deque<GForceSample>,
    mode: BufferMode,
    buffer_time_ms: Millis,
    updates_after_touch: u32,
    max_g: f64,
}

impl PeakGTracker {
    pub fn new(config: &LandingConfig) -> Self {
        PeakGTracker {
            samples: Deque::new(config.g_buffer_capacity),
            mode: BufferMode::Trim,
            buffer_time_ms: config.g_buffer_time_ms,
            updates_after_touch: config.g_updates_after_touch,
            max_g: 0.0,
        }
    }

    /// Opens the touchdown window and returns the peak over what is already buffered.
    pub fn activate(&mut self) -> f64 {
        self.mode = if self.updates_after_touch > 0 {
            BufferMode::Retain {
                remaining: self.updates_after_touch,
            }
        } else {
            BufferMode::Trim
        };
        self.recompute()
    }

    pub fn deactivate(&mut self) {
        self.samples.clear();
        self.mode = BufferMode::Trim;
    }

    /// Buffers a sample. Returns the new peak when this sample fell inside the touchdown window.
    pub fn record_sample(&mut self, value: f64, now: Millis) -> Option<f64> {
        let timestamp = match self.samples.iter().last() {
            Some(newest) if newest.timestamp > now => {
                warn!(
                    now,
                    newest = newest.timestamp,
                    "g-force sample older than buffer tail, clamping timestamp"
                );
                newest.timestamp
            }
            _ => now,
        };

        match self.mode {
            BufferMode::Trim => {
                self.trim(timestamp);
                self.samples.push_back(GForceSample { timestamp, value });
                None
            }
            BufferMode::Retain { remaining } => {
                self.samples.push_back(GForceSample { timestamp, value });
                let max = self.recompute();
                self.mode = if remaining > 1 {
                    BufferMode::Retain {
                        remaining: remaining - 1,
                    }
                } else {
                    BufferMode::Trim
                };
                Some(max)
            }
        }
    }

    pub fn max_g(&self) -> f64 {
        self.max_g
    }

    pub fn mode(&self) -> BufferMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    fn trim(&mut self, now: Millis) {
        while let Some(oldest) = self.samples.front() {
            if now.saturating_sub(oldest.timestamp) < self.buffer_time_ms {
                break;
            }
            self.samples.pop_front();
        }
    }

    fn recompute(&mut self) -> f64 {
        self.max_g = self
            .samples
            .iter()
            .map(|sample| sample.value)
            .fold(0.0, f64::max);
        debug!(max_g = self.max_g, samples = self.samples.len(), "peak g recomputed");
        self.max_g
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> PeakGTracker {
        PeakGTracker::new(&LandingConfig::default())
    }

    #[test]
    fn test_empty_buffer_peak_is_zero() {
        let mut tracker = tracker();
        assert_eq!(tracker.max_g(), 0.0);
        assert_eq!(tracker.activate(), 0.0);
    }

    #[test]
    fn test_idle_samples_do_not_accumulate() {
        let mut tracker = tracker();
        for i in 0..20 {
            assert_eq!(tracker.record_sample(1.0, i * 1_500), None);
            assert_eq!(tracker.len(), 1);
        }
    }

    #[test]
    fn test_idle_buffer_keeps_last_second() {
        let mut tracker = tracker();
        for i in 0..10 {
            tracker.record_sample(1.0, i * 250);
        }
        // At t=2250 everything before t=1250 has aged out.
        assert_eq!(tracker.len(), 4);
    }

    #[test]
    fn test_peak_over_countdown_window() {
        let mut tracker = tracker();
        assert_eq!(tracker.activate(), 0.0);
        assert_eq!(tracker.record_sample(1.2, 0), Some(1.2));
        assert_eq!(tracker.record_sample(2.7, 100), Some(2.7));
        assert_eq!(tracker.record_sample(1.9, 200), Some(2.7));
        assert_eq!(tracker.mode(), BufferMode::Trim);

        // Window closed: later spikes are buffered but not reported.
        assert_eq!(tracker.record_sample(5.0, 300), None);
        assert_eq!(tracker.max_g(), 2.7);
    }

    #[test]
    fn test_activate_includes_samples_before_contact() {
        let mut tracker = tracker();
        tracker.record_sample(1.4, 0);
        tracker.record_sample(1.8, 500);
        assert_eq!(tracker.activate(), 1.8);
    }

    #[test]
    fn test_deactivate_clears_buffer_and_closes_window() {
        let mut tracker = tracker();
        tracker.activate();
        tracker.record_sample(2.0, 0);
        tracker.deactivate();
        assert!(tracker.is_empty());
        assert_eq!(tracker.mode(), BufferMode::Trim);
        assert_eq!(tracker.record_sample(3.0, 100), None);
    }

    #[test]
    fn test_retain_mode_keeps_old_samples() {
        let mut tracker = tracker();
        tracker.record_sample(4.0, 0);
        tracker.activate();
        tracker.record_sample(1.0, 5_000);
        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.max_g(), 4.0);
    }

    #[test]
    fn test_out_of_order_sample_is_clamped() {
        let mut tracker = tracker();
        tracker.record_sample(1.0, 2_000);
        tracker.record_sample(1.1, 1_000);
        tracker.record_sample(1.2, 2_999);
        assert_eq!(tracker.len(), 3);
    }
}
