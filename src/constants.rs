//! Constants used throughout the program.

/// Milliseconds on the ground after which a touch is no longer considered a bounce:
pub const BOUNCE_TIME_MILLIS: u64 = 3_000;

/// Milliseconds in the air after which a bounce is considered to be flight again:
pub const FLYING_TIME_MILLIS: u64 = 10_000;

/// Age after which g-force samples are dropped while no touchdown window is open:
pub const G_BUFFER_TIME_MILLIS: u64 = 1_000;

/// Number of g-force samples after a touch during which the peak is recomputed:
pub const G_UPDATES_AFTER_TOUCH: u32 = 3;

/// Hard cap on buffered g-force samples.
pub const G_BUFFER_CAPACITY: usize = 256;

/// Decimal places g-force samples are quantised to before delivery.
pub const G_FORCE_PRECISION: u32 = 2;

pub const TRANSMIT_INTERVAL_MILLIS: u64 = 200;
pub const SERIAL_READ_TIMEOUT_MILLIS: u64 = 50;

/// Longest event line accepted before the buffered bytes are thrown away.
pub const MAX_LINE_BYTES: usize = 4096;
