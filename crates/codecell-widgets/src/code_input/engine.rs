#![forbid(unsafe_code)]

//! The two animated channels of a code input.
//!
//! - **Pulse**: a scale factor looping 1.0 → peak → 1.0 forever while the
//!   input is both animated and focused. Applied to the active cell only.
//! - **Shake**: a horizontal offset played on demand through
//!   [`AnimationEngine::animate`]. Applied to the whole row.
//!
//! Each channel is an explicit `Idle`/`Running` state machine. Starting a
//! channel that is already running cancels the running schedule first, so
//! the most recent request always owns the channel.
//!
//! # Shake sequence
//!
//! With `leg = duration / 10`: move to `-amplitude`, then
//! `+amplitude`/`-amplitude` three times, then back to `0`, every leg
//! linear. The returned [`AnimationResult`] resolves on the tick that lands
//! on the final zero.

use std::fmt;
use std::time::Duration;

use codecell_core::animation::{Animation, Keyframes, Leg, Looping, ease_in_out};
use codecell_core::deferred::{self, Deferred, Resolver};

use super::config::PulseConfig;

/// The only animation kind the engine knows how to play.
pub const SHAKE: &str = "shake";

/// Default total shake duration.
pub const DEFAULT_SHAKE_DURATION: Duration = Duration::from_millis(650);

/// Default shake amplitude in host units.
pub const DEFAULT_SHAKE_AMPLITUDE: f32 = 8.0;

/// Number of `+amplitude`/`-amplitude` repetitions in the middle of a shake.
const SHAKE_SWINGS: usize = 3;

/// Why an [`AnimationEngine::animate`] request failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimateError {
    /// The input was configured with `animated = false`.
    Disabled,
    /// The requested animation kind is not supported.
    UnknownAnimation(String),
    /// A newer request replaced this one, or the input was unmounted.
    Cancelled,
}

impl fmt::Display for AnimateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "animations disabled"),
            Self::UnknownAnimation(kind) => write!(f, "unknown animation: {kind:?}"),
            Self::Cancelled => write!(f, "animation cancelled"),
        }
    }
}

impl std::error::Error for AnimateError {}

/// Deferred outcome of an `animate`/`shake` call.
pub type AnimationResult = Deferred<(), AnimateError>;

/// Options for [`AnimationEngine::animate`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnimateOptions {
    /// Animation kind; only [`SHAKE`] is supported.
    pub animation: String,
    /// Total duration the sequence is divided over.
    pub duration: Duration,
    /// Peak horizontal offset.
    pub amplitude: f32,
}

impl Default for AnimateOptions {
    fn default() -> Self {
        Self {
            animation: SHAKE.to_string(),
            duration: DEFAULT_SHAKE_DURATION,
            amplitude: DEFAULT_SHAKE_AMPLITUDE,
        }
    }
}

impl AnimateOptions {
    /// Default shake options.
    pub fn shake() -> Self {
        Self::default()
    }

    /// Request a different animation kind.
    #[must_use]
    pub fn with_animation(mut self, animation: impl Into<String>) -> Self {
        self.animation = animation.into();
        self
    }

    /// Override the total duration.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Override the amplitude.
    #[must_use]
    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude;
        self
    }
}

// ---------------------------------------------------------------------------
// Pulse channel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum PulseState {
    Idle,
    Running(Looping<Keyframes>),
}

/// Looping focus pulse. Neutral value is `1.0`.
#[derive(Debug, Clone)]
pub struct PulseChannel {
    config: PulseConfig,
    state: PulseState,
}

impl PulseChannel {
    /// An idle pulse channel.
    pub fn new(config: PulseConfig) -> Self {
        Self {
            config,
            state: PulseState::Idle,
        }
    }

    /// Start looping. A running pulse keeps its phase.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        let cycle = Keyframes::new(1.0)
            .then(Leg::eased(self.config.scale, self.config.leg, ease_in_out))
            .then(Leg::eased(1.0, self.config.leg, ease_in_out));
        self.state = PulseState::Running(Looping::forever(cycle));
        codecell_core::debug!(peak = self.config.scale, "pulse started");
    }

    /// Stop and snap back to `1.0`.
    pub fn stop(&mut self) {
        if let PulseState::Running(_) = std::mem::replace(&mut self.state, PulseState::Idle) {
            codecell_core::debug!("pulse stopped");
        }
    }

    /// Whether the loop is running.
    pub fn is_running(&self) -> bool {
        matches!(self.state, PulseState::Running(_))
    }

    /// Current scale factor.
    pub fn value(&self) -> f32 {
        match &self.state {
            PulseState::Idle => 1.0,
            PulseState::Running(anim) => anim.inner().position(),
        }
    }

    fn tick(&mut self, dt: Duration) {
        if let PulseState::Running(anim) = &mut self.state {
            anim.tick(dt);
        }
    }
}

// ---------------------------------------------------------------------------
// Shake channel
// ---------------------------------------------------------------------------

enum ShakeState {
    Idle,
    Running {
        track: Keyframes,
        resolver: Resolver<(), AnimateError>,
    },
}

/// On-demand horizontal shake. Neutral value is `0.0`.
pub struct ShakeChannel {
    state: ShakeState,
}

impl fmt::Debug for ShakeChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShakeChannel")
            .field("running", &self.is_running())
            .field("offset", &self.value())
            .finish()
    }
}

impl Default for ShakeChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl ShakeChannel {
    /// An idle shake channel.
    pub fn new() -> Self {
        Self {
            state: ShakeState::Idle,
        }
    }

    /// Build the shake keyframes for `amplitude` over `duration`.
    pub fn track(amplitude: f32, duration: Duration) -> Keyframes {
        let leg = duration / 10;
        let mut track = Keyframes::new(0.0).then(Leg::linear(-amplitude, leg));
        for _ in 0..SHAKE_SWINGS {
            track = track
                .then(Leg::linear(amplitude, leg))
                .then(Leg::linear(-amplitude, leg));
        }
        track.then(Leg::linear(0.0, leg))
    }

    /// Start a shake, cancelling any shake in flight.
    pub fn start(&mut self, amplitude: f32, duration: Duration) -> AnimationResult {
        self.cancel();
        let (resolver, deferred) = deferred::channel(AnimateError::Cancelled);
        self.state = ShakeState::Running {
            track: Self::track(amplitude, duration),
            resolver,
        };
        codecell_core::debug!(amplitude, duration_ms = (duration.as_millis() as u64), "shake started");
        deferred
    }

    /// Abort the running shake; its result fails with `Cancelled` and the
    /// offset snaps to `0.0`.
    pub fn cancel(&mut self) {
        if let ShakeState::Running { resolver, .. } =
            std::mem::replace(&mut self.state, ShakeState::Idle)
        {
            resolver.reject(AnimateError::Cancelled);
            codecell_core::debug!("shake cancelled");
        }
    }

    /// Whether a shake is in flight.
    pub fn is_running(&self) -> bool {
        matches!(self.state, ShakeState::Running { .. })
    }

    /// Current horizontal offset.
    pub fn value(&self) -> f32 {
        match &self.state {
            ShakeState::Idle => 0.0,
            ShakeState::Running { track, .. } => track.position(),
        }
    }

    fn tick(&mut self, dt: Duration) {
        let ShakeState::Running { track, .. } = &mut self.state else {
            return;
        };
        track.tick(dt);
        if !track.is_complete() {
            return;
        }
        if let ShakeState::Running { resolver, .. } =
            std::mem::replace(&mut self.state, ShakeState::Idle)
        {
            resolver.resolve(());
            codecell_core::debug!("shake completed");
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Both channels plus the global `animated` switch.
#[derive(Debug)]
pub struct AnimationEngine {
    animated: bool,
    pulse: PulseChannel,
    shake: ShakeChannel,
}

impl AnimationEngine {
    /// An engine with both channels idle.
    pub fn new(animated: bool, pulse: PulseConfig) -> Self {
        Self {
            animated,
            pulse: PulseChannel::new(pulse),
            shake: ShakeChannel::new(),
        }
    }

    /// Whether animations are enabled.
    pub fn is_animated(&self) -> bool {
        self.animated
    }

    /// Play an animation on the shake channel.
    ///
    /// Fails immediately, without motion, when animations are disabled or
    /// the kind is unknown. A running shake is replaced.
    pub fn animate(&mut self, options: &AnimateOptions) -> AnimationResult {
        if !self.animated {
            codecell_core::debug!("animate rejected: animations disabled");
            return Deferred::rejected(AnimateError::Disabled);
        }
        if options.animation != SHAKE {
            codecell_core::debug!(kind = %options.animation, "animate rejected: unknown animation");
            return Deferred::rejected(AnimateError::UnknownAnimation(options.animation.clone()));
        }
        self.shake.start(options.amplitude, options.duration)
    }

    /// Start or stop the pulse so it runs exactly while animated and focused.
    pub fn sync_pulse(&mut self, focused: bool) {
        if self.animated && focused {
            self.pulse.start();
        } else {
            self.pulse.stop();
        }
    }

    /// Flip the global switch. Turning it off stops the pulse and cancels a
    /// shake in flight.
    pub fn set_animated(&mut self, animated: bool, focused: bool) {
        self.animated = animated;
        if !animated {
            self.shake.cancel();
        }
        self.sync_pulse(focused);
    }

    /// Advance both channels.
    pub fn tick(&mut self, dt: Duration) {
        self.pulse.tick(dt);
        self.shake.tick(dt);
    }

    /// Cancel everything; used on unmount.
    pub fn shutdown(&mut self) {
        self.pulse.stop();
        self.shake.cancel();
    }

    /// Current pulse scale.
    pub fn pulse_scale(&self) -> f32 {
        self.pulse.value()
    }

    /// Current shake offset.
    pub fn shake_offset(&self) -> f32 {
        self.shake.value()
    }

    /// The pulse channel.
    pub fn pulse(&self) -> &PulseChannel {
        &self.pulse
    }

    /// The shake channel.
    pub fn shake(&self) -> &ShakeChannel {
        &self.shake
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_65: Duration = Duration::from_millis(65);

    fn engine() -> AnimationEngine {
        AnimationEngine::new(true, PulseConfig::default())
    }

    #[test]
    fn shake_track_visits_expected_extremes() {
        let mut track = ShakeChannel::track(8.0, DEFAULT_SHAKE_DURATION);
        assert_eq!(track.len(), 8);
        let mut seen = Vec::new();
        for _ in 0..8 {
            track.tick(MS_65);
            seen.push(track.position());
        }
        let expected = [-8.0, 8.0, -8.0, 8.0, -8.0, 8.0, -8.0, 0.0];
        for (got, want) in seen.iter().zip(expected) {
            assert!((got - want).abs() < 1e-4, "got {got}, want {want}");
        }
        assert!(track.is_complete());
    }

    #[test]
    fn shake_resolves_once_at_zero() {
        let mut engine = engine();
        let mut result = engine.animate(&AnimateOptions::shake());
        assert!(engine.shake().is_running());

        for _ in 0..7 {
            engine.tick(MS_65);
            assert!(!result.is_settled());
        }
        engine.tick(MS_65);
        assert_eq!(result.try_result(), Some(Ok(())));
        assert_eq!(engine.shake_offset(), 0.0);
        assert!(!engine.shake().is_running());

        engine.tick(Duration::from_secs(1));
        assert_eq!(result.try_result(), Some(Ok(())));
    }

    #[test]
    fn disabled_rejects_without_motion() {
        let mut engine = AnimationEngine::new(false, PulseConfig::default());
        let mut result = engine.animate(&AnimateOptions::shake());
        assert_eq!(result.try_result(), Some(Err(AnimateError::Disabled)));
        engine.tick(MS_65);
        assert_eq!(engine.shake_offset(), 0.0);
    }

    #[test]
    fn disabled_wins_over_unknown_kind() {
        let mut engine = AnimationEngine::new(false, PulseConfig::default());
        let mut result = engine.animate(&AnimateOptions::shake().with_animation("bogus"));
        assert_eq!(result.try_result(), Some(Err(AnimateError::Disabled)));
    }

    #[test]
    fn unknown_kind_rejects_without_motion() {
        let mut engine = engine();
        let mut result = engine.animate(&AnimateOptions::shake().with_animation("bogus"));
        assert_eq!(
            result.try_result(),
            Some(Err(AnimateError::UnknownAnimation("bogus".into())))
        );
        assert!(!engine.shake().is_running());
    }

    #[test]
    fn restart_cancels_previous_shake() {
        let mut engine = engine();
        let mut first = engine.animate(&AnimateOptions::shake());
        engine.tick(Duration::from_millis(100));
        let mut second = engine.animate(&AnimateOptions::shake());

        assert_eq!(first.try_result(), Some(Err(AnimateError::Cancelled)));
        assert!(!second.is_settled());
        // The new run starts from the origin.
        assert_eq!(engine.shake_offset(), 0.0);

        engine.tick(Duration::from_millis(520));
        assert_eq!(second.try_result(), Some(Ok(())));
        assert_eq!(first.try_result(), Some(Err(AnimateError::Cancelled)));
    }

    #[test]
    fn custom_duration_and_amplitude() {
        let mut engine = engine();
        let options = AnimateOptions::shake()
            .with_duration(Duration::from_millis(100))
            .with_amplitude(2.0);
        let mut result = engine.animate(&options);
        engine.tick(Duration::from_millis(10));
        assert!((engine.shake_offset() + 2.0).abs() < 1e-4);
        engine.tick(Duration::from_millis(70));
        assert_eq!(result.try_result(), Some(Ok(())));
    }

    #[test]
    fn pulse_follows_focus() {
        let mut engine = engine();
        engine.sync_pulse(true);
        assert!(engine.pulse().is_running());
        engine.tick(Duration::from_millis(250));
        assert!((engine.pulse_scale() - 1.06).abs() < 1e-4);

        engine.sync_pulse(false);
        assert!(!engine.pulse().is_running());
        assert_eq!(engine.pulse_scale(), 1.0);
    }

    #[test]
    fn pulse_never_starts_when_disabled() {
        let mut engine = AnimationEngine::new(false, PulseConfig::default());
        engine.sync_pulse(true);
        engine.tick(Duration::from_millis(100));
        assert_eq!(engine.pulse_scale(), 1.0);
    }

    #[test]
    fn disabling_stops_everything() {
        let mut engine = engine();
        engine.sync_pulse(true);
        let mut result = engine.animate(&AnimateOptions::shake());
        engine.tick(Duration::from_millis(30));

        engine.set_animated(false, true);
        assert_eq!(result.try_result(), Some(Err(AnimateError::Cancelled)));
        assert_eq!(engine.shake_offset(), 0.0);
        assert_eq!(engine.pulse_scale(), 1.0);

        engine.set_animated(true, true);
        assert!(engine.pulse().is_running());
    }

    #[test]
    fn shutdown_cancels_in_flight_shake() {
        let mut engine = engine();
        let mut result = engine.animate(&AnimateOptions::shake());
        engine.shutdown();
        assert_eq!(result.try_result(), Some(Err(AnimateError::Cancelled)));
    }

    #[test]
    fn zero_pulse_leg_keeps_frames_cheap() {
        let pulse = PulseConfig {
            scale: 1.06,
            leg: Duration::ZERO,
        };
        let mut engine = AnimationEngine::new(true, pulse);
        engine.sync_pulse(true);

        let started = std::time::Instant::now();
        for _ in 0..60 {
            engine.tick(Duration::from_millis(16));
        }
        assert!(started.elapsed() < Duration::from_secs(1));
        assert!((1.0..=1.06).contains(&engine.pulse_scale()));
    }

    #[test]
    fn error_messages() {
        assert_eq!(AnimateError::Disabled.to_string(), "animations disabled");
        assert_eq!(
            AnimateError::UnknownAnimation("spin".into()).to_string(),
            "unknown animation: \"spin\""
        );
    }
}
