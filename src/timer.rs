//! Single-shot deadline with generation tokens.
//!
//! Arming bumps the generation, so whatever was pending before is superseded.
//! An expiry carrying an old token is stale and must be ignored by the caller.

/// Monotonic milliseconds.
pub type Millis = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerToken(u64);

#[derive(Debug, Clone, Copy)]
struct Pending {
    token: TimerToken,
    deadline: Millis,
}

#[derive(Debug, Default)]
pub struct Timer {
    generation: u64,
    pending: Option<Pending>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, duration: Millis, now: Millis) -> TimerToken {
        self.generation += 1;
        let token = TimerToken(self.generation);
        self.pending = Some(Pending {
            token,
            deadline: now.saturating_add(duration),
        });
        token
    }

    /// Supersedes whatever is pending without arming a new deadline.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.pending = None;
    }

    pub fn deadline(&self) -> Option<Millis> {
        self.pending.map(|pending| pending.deadline)
    }

    /// Takes the pending expiry if its deadline has passed. Each armed timer fires at most once.
    pub fn poll(&mut self, now: Millis) -> Option<(TimerToken, Millis)> {
        match self.pending {
            Some(pending) if pending.deadline <= now => {
                self.pending = None;
                Some((pending.token, pending.deadline))
            }
            _ => None,
        }
    }

    pub fn is_current(&self, token: TimerToken) -> bool {
        token.0 == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_at_deadline() {
        let mut timer = Timer::new();
        let token = timer.arm(3_000, 1_000);
        assert_eq!(timer.deadline(), Some(4_000));
        assert_eq!(timer.poll(3_999), None);
        assert_eq!(timer.poll(4_000), Some((token, 4_000)));
        assert_eq!(timer.poll(10_000), None);
        assert_eq!(timer.deadline(), None);
    }

    #[test]
    fn test_rearm_supersedes_pending() {
        let mut timer = Timer::new();
        let first = timer.arm(3_000, 0);
        let second = timer.arm(10_000, 1_000);
        assert!(!timer.is_current(first));
        assert!(timer.is_current(second));
        assert_eq!(timer.poll(5_000), None);
        assert_eq!(timer.poll(11_000), Some((second, 11_000)));
    }

    #[test]
    fn test_cancel_drops_pending() {
        let mut timer = Timer::new();
        let token = timer.arm(3_000, 0);
        timer.cancel();
        assert!(!timer.is_current(token));
        assert_eq!(timer.deadline(), None);
        assert_eq!(timer.poll(5_000), None);
    }
}
