#![forbid(unsafe_code)]

//! Frame-driven animation primitives.
//!
//! Animations are advanced explicitly by the host with [`Animation::tick`];
//! nothing here owns a clock or a thread.
//!
//! [`Keyframes`] is a scalar track whose [`Animation::value`] is progress
//! in [0.0, 1.0] and whose `position()` is the interpolated value in
//! arbitrary units (pixels, scale factors). [`Looping`] repeats any
//! animation forever, forwarding overshoot so a loop driven by uneven frame
//! times never drifts.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in-out (slow start and end).
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A time-based animation producing values in [0.0, 1.0].
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current output value, clamped to [0.0, 1.0].
    fn value(&self) -> f32;

    /// Reset the animation to its initial state.
    fn reset(&mut self);

    /// Time elapsed past completion, forwarded by [`Looping`] into the next
    /// iteration. [`Duration::ZERO`] for animations that never complete.
    fn overshoot(&self) -> Duration {
        Duration::ZERO
    }
}

fn non_zero(duration: Duration) -> Duration {
    if duration.is_zero() {
        Duration::from_nanos(1)
    } else {
        duration
    }
}

fn ratio(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    let t = elapsed.as_secs_f64() / duration.as_secs_f64();
    (t as f32).clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// Keyframes
// ---------------------------------------------------------------------------

/// One segment of a [`Keyframes`] track: move to `to` over `duration`.
#[derive(Debug, Clone, Copy)]
pub struct Leg {
    /// Target position at the end of the leg.
    pub to: f32,
    /// Time spent travelling to `to`.
    pub duration: Duration,
    /// Easing applied within the leg.
    pub easing: EasingFn,
}

impl Leg {
    /// A linear leg.
    pub fn linear(to: f32, duration: Duration) -> Self {
        Self {
            to,
            duration: non_zero(duration),
            easing: linear,
        }
    }

    /// A leg with an explicit easing.
    pub fn eased(to: f32, duration: Duration, easing: EasingFn) -> Self {
        Self {
            to,
            duration: non_zero(duration),
            easing,
        }
    }
}

/// A scalar track made of consecutive legs, each starting where the
/// previous one ended.
///
/// Time past the end of a leg carries into the next, so one large `dt` can
/// cross several legs. Once every leg has run, `position()` holds at the
/// final leg's target.
///
/// # Invariants
///
/// 1. `position()` at time zero equals `origin`.
/// 2. `position()` after completion equals the last leg's `to` exactly.
/// 3. `value()` is the fraction of total track time elapsed.
#[derive(Debug, Clone)]
pub struct Keyframes {
    origin: f32,
    legs: Vec<Leg>,
    /// Index of the running leg; `legs.len()` once finished.
    current: usize,
    /// Time spent inside the running leg.
    leg_elapsed: Duration,
    overshoot: Duration,
}

impl Keyframes {
    /// Create a track starting at `origin` with no legs.
    #[must_use]
    pub fn new(origin: f32) -> Self {
        Self {
            origin,
            legs: Vec::new(),
            current: 0,
            leg_elapsed: Duration::ZERO,
            overshoot: Duration::ZERO,
        }
    }

    /// Append a leg (builder pattern).
    #[must_use]
    pub fn then(mut self, leg: Leg) -> Self {
        self.legs.push(leg);
        self
    }

    /// Number of legs in the track.
    pub fn len(&self) -> usize {
        self.legs.len()
    }

    /// Whether the track has no legs.
    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Sum of every leg's duration.
    pub fn total_duration(&self) -> Duration {
        self.legs.iter().map(|leg| leg.duration).sum()
    }

    /// Index of the leg currently running, `None` once finished.
    pub fn current_leg(&self) -> Option<usize> {
        (self.current < self.legs.len()).then_some(self.current)
    }

    fn start_of(&self, index: usize) -> f32 {
        match index.checked_sub(1) {
            Some(prev) => self.legs[prev].to,
            None => self.origin,
        }
    }

    /// Current interpolated position.
    pub fn position(&self) -> f32 {
        match self.legs.get(self.current) {
            Some(leg) => {
                let from = self.start_of(self.current);
                let t = (leg.easing)(ratio(self.leg_elapsed, leg.duration));
                from + (leg.to - from) * t
            }
            None => self.start_of(self.legs.len()),
        }
    }

    fn elapsed_total(&self) -> Duration {
        let finished: Duration = self.legs[..self.current.min(self.legs.len())]
            .iter()
            .map(|leg| leg.duration)
            .sum();
        finished.saturating_add(self.leg_elapsed)
    }
}

impl Animation for Keyframes {
    fn tick(&mut self, dt: Duration) {
        let mut remaining = dt;
        while let Some(leg) = self.legs.get(self.current) {
            let left = leg.duration.saturating_sub(self.leg_elapsed);
            if remaining < left {
                self.leg_elapsed += remaining;
                return;
            }
            remaining -= left;
            self.current += 1;
            self.leg_elapsed = Duration::ZERO;
        }
        self.overshoot = self.overshoot.saturating_add(remaining);
    }

    fn is_complete(&self) -> bool {
        self.current >= self.legs.len()
    }

    fn value(&self) -> f32 {
        if self.is_complete() {
            return 1.0;
        }
        ratio(self.elapsed_total(), non_zero(self.total_duration()))
    }

    fn reset(&mut self) {
        self.current = 0;
        self.leg_elapsed = Duration::ZERO;
        self.overshoot = Duration::ZERO;
    }

    fn overshoot(&self) -> Duration {
        self.overshoot
    }
}

// ---------------------------------------------------------------------------
// Looping
// ---------------------------------------------------------------------------

/// Repeat an animation forever.
///
/// Overshoot from each finished iteration is forwarded into the next one.
/// When a single tick spans many iterations (a very short cycle, or a long
/// stall), whole cycles are skipped arithmetically, so the cost of a tick
/// does not grow with `dt`.
#[derive(Debug, Clone)]
pub struct Looping<A> {
    inner: A,
    completed: u64,
}

impl<A: Animation> Looping<A> {
    /// Repeat `inner` forever.
    pub fn forever(inner: A) -> Self {
        Self {
            inner,
            completed: 0,
        }
    }

    /// Access the running iteration.
    pub fn inner(&self) -> &A {
        &self.inner
    }

    /// Number of finished iterations.
    pub fn iterations(&self) -> u64 {
        self.completed
    }

    /// Start a fresh iteration and feed it `carry`.
    fn restart_with(&mut self, carry: Duration) {
        self.inner.reset();
        if !carry.is_zero() {
            self.inner.tick(carry);
        }
    }
}

impl<A: Animation> Animation for Looping<A> {
    fn tick(&mut self, dt: Duration) {
        self.inner.tick(dt);
        if !self.inner.is_complete() {
            return;
        }
        self.completed = self.completed.saturating_add(1);
        let carry = self.inner.overshoot();
        self.restart_with(carry);
        if !self.inner.is_complete() {
            return;
        }

        // The carry covered at least one more iteration. What it consumed
        // is the cycle length.
        let rest = self.inner.overshoot();
        let cycle = carry.saturating_sub(rest);
        self.completed = self.completed.saturating_add(1);
        if cycle.is_zero() {
            // Completes without consuming time: nothing to play.
            self.restart_with(Duration::ZERO);
            return;
        }
        let whole = rest.as_nanos() / cycle.as_nanos();
        let leftover = rest.as_nanos() % cycle.as_nanos();
        self.completed = self
            .completed
            .saturating_add(u64::try_from(whole).unwrap_or(u64::MAX));
        // `leftover < cycle`, so this tick cannot complete the iteration.
        self.restart_with(Duration::from_nanos(
            u64::try_from(leftover).unwrap_or_default(),
        ));
    }

    fn is_complete(&self) -> bool {
        false
    }

    fn value(&self) -> f32 {
        self.inner.value()
    }

    fn reset(&mut self) {
        self.inner.reset();
        self.completed = 0;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
