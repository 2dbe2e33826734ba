#![forbid(unsafe_code)]

//! The password-mode reveal window.
//!
//! When a character is typed in password mode it stays visible for a short
//! delay before being masked. [`RevealTimer`] owns that window and at most
//! one pending deadline; scheduling again replaces the deadline.

use std::time::Duration;

/// A one-shot countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Deadline {
    remaining: Duration,
}

impl Deadline {
    fn new(after: Duration) -> Self {
        Self { remaining: after }
    }

    /// Count down; `true` once the deadline has passed.
    fn tick(&mut self, dt: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(dt);
        self.remaining.is_zero()
    }
}

/// Reveal window state.
#[derive(Debug, Clone)]
pub struct RevealTimer {
    delay: Duration,
    revealing: bool,
    pending: Option<Deadline>,
}

impl RevealTimer {
    /// A closed window that opens for `delay` on each reveal.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            revealing: false,
            pending: None,
        }
    }

    /// Whether the newest character is currently shown unmasked.
    pub fn is_revealing(&self) -> bool {
        self.revealing
    }

    /// Time until the window closes, if open.
    pub fn remaining(&self) -> Option<Duration> {
        self.pending.map(|deadline| deadline.remaining)
    }

    /// The configured window length.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Open a fresh window (replacing any pending one) or close it now.
    pub fn schedule(&mut self, reveal: bool) {
        if !reveal || self.delay.is_zero() {
            self.cancel();
            return;
        }
        self.revealing = true;
        self.pending = Some(Deadline::new(self.delay));
        codecell_core::trace!(delay_ms = (self.delay.as_millis() as u64), "reveal window opened");
    }

    /// Close the window and drop the pending deadline.
    pub fn cancel(&mut self) {
        self.revealing = false;
        self.pending = None;
    }

    /// Advance the deadline. Returns `true` if the window closed on this tick.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let Some(deadline) = self.pending.as_mut() else {
            return false;
        };
        if !deadline.tick(dt) {
            return false;
        }
        self.cancel();
        codecell_core::trace!("reveal window closed");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);
    const MS_200: Duration = Duration::from_millis(200);

    #[test]
    fn opens_then_closes_after_delay() {
        let mut timer = RevealTimer::new(MS_200);
        timer.schedule(true);
        assert!(timer.is_revealing());

        assert!(!timer.tick(Duration::from_millis(199)));
        assert!(timer.is_revealing());

        assert!(timer.tick(Duration::from_millis(1)));
        assert!(!timer.is_revealing());
        assert_eq!(timer.remaining(), None);
    }

    #[test]
    fn reschedule_restarts_the_window() {
        let mut timer = RevealTimer::new(MS_200);
        timer.schedule(true);
        timer.tick(Duration::from_millis(150));
        timer.schedule(true);
        assert_eq!(timer.remaining(), Some(MS_200));

        timer.tick(MS_100);
        assert!(timer.is_revealing());
        timer.tick(MS_100);
        assert!(!timer.is_revealing());
    }

    #[test]
    fn schedule_false_closes_immediately() {
        let mut timer = RevealTimer::new(MS_200);
        timer.schedule(true);
        timer.schedule(false);
        assert!(!timer.is_revealing());
        assert_eq!(timer.remaining(), None);
    }

    #[test]
    fn zero_delay_never_opens() {
        let mut timer = RevealTimer::new(Duration::ZERO);
        timer.schedule(true);
        assert!(!timer.is_revealing());
    }

    #[test]
    fn tick_without_pending_is_noop() {
        let mut timer = RevealTimer::new(MS_200);
        assert!(!timer.tick(Duration::from_secs(5)));
        assert!(!timer.is_revealing());
    }
}
