use crate::constants::{
    BOUNCE_TIME_MILLIS, FLYING_TIME_MILLIS, G_BUFFER_CAPACITY, G_BUFFER_TIME_MILLIS,
    G_FORCE_PRECISION, G_UPDATES_AFTER_TOUCH,
};

/// Timing and buffering parameters for the classifier and the peak-g tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandingConfig {
    pub bounce_time_ms: u64,
    pub flying_time_ms: u64,
    pub g_buffer_time_ms: u64,
    pub g_updates_after_touch: u32,
    pub g_buffer_capacity: usize,
    pub g_precision: u32,
}

impl Default for LandingConfig {
    fn default() -> Self {
        Self {
            bounce_time_ms: BOUNCE_TIME_MILLIS,
            flying_time_ms: FLYING_TIME_MILLIS,
            g_buffer_time_ms: G_BUFFER_TIME_MILLIS,
            g_updates_after_touch: G_UPDATES_AFTER_TOUCH,
            g_buffer_capacity: G_BUFFER_CAPACITY,
            g_precision: G_FORCE_PRECISION,
        }
    }
}
