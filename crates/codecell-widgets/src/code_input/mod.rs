#![forbid(unsafe_code)]

//! Segmented code input.
//!
//! A row of cells presenting one short code (a PIN or one-time password),
//! layered over a hidden [`EntrySurface`] that does the actual text editing.
//! The input turns the surface's notifications into a validated code, masks
//! it in password mode with a short reveal window for the newest character,
//! pulses the active cell while focused, and shakes on request.
//!
//! # Frame loop
//!
//! ```
//! use std::time::Duration;
//! use codecell_core::event::EntryEvent;
//! use codecell_widgets::code_input::{CodeInput, CodeInputConfig, EntrySurface};
//!
//! struct Hidden;
//!
//! impl EntrySurface for Hidden {
//!     fn focus(&mut self) {}
//!     fn blur(&mut self) {}
//!     fn clear(&mut self) {}
//! }
//!
//! let mut input = CodeInput::new(CodeInputConfig::new().with_password(true));
//! input.mount(Hidden);
//! let handle = input.handle();
//!
//! input.handle_event(&EntryEvent::TextChanged("1".into()));
//! assert_eq!(input.view().text(), "1   ");
//!
//! let mut shake = handle.shake();
//! for _ in 0..50 {
//!     input.tick(Duration::from_millis(16));
//! }
//! assert_eq!(input.view().text(), "*   ");
//! assert_eq!(shake.try_result(), Some(Ok(())));
//! ```
//!
//! # Invariants
//!
//! 1. The value never exceeds the code length; with digit restriction it
//!    holds ASCII digits only.
//! 2. At most one reveal deadline and one shake are pending.
//! 3. The pulse runs exactly while `animated` and focused.
//! 4. Unmounting (or dropping) cancels both channels and the reveal window;
//!    no deferred result is left unsettled.
//! 5. While unmounted, `animate` fails with `Cancelled` and nothing is
//!    focused.

pub mod buffer;
pub mod callbacks;
pub mod cells;
pub mod config;
pub mod engine;
pub mod focus;
pub mod handle;
pub mod reveal;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use codecell_core::event::{EntryEvent, KeyEvent};

pub use buffer::{CodeBuffer, Submission};
pub use callbacks::CodeInputCallbacks;
pub use cells::{CellContent, CellView, RowState, RowView, render_row};
pub use config::{Adornment, CodeInputConfig, CodeInputStyles, ElementKey, PulseConfig};
pub use engine::{AnimateError, AnimateOptions, AnimationEngine, AnimationResult};
pub use focus::{FocusChange, FocusTracker};
pub use handle::{CodeInputHandle, EntrySurface};
pub use reveal::RevealTimer;

use handle::Shared;

/// A segmented code input.
pub struct CodeInput {
    config: CodeInputConfig,
    buffer: CodeBuffer,
    reveal: RevealTimer,
    focus: FocusTracker,
    callbacks: CodeInputCallbacks,
    shared: Rc<RefCell<Shared>>,
}

impl std::fmt::Debug for CodeInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeInput")
            .field("len", &self.buffer.len())
            .field("code_length", &self.buffer.code_length())
            .field("focused", &self.focus.is_focused())
            .field("revealing", &self.reveal.is_revealing())
            .field("mounted", &self.is_mounted())
            .field("callbacks", &self.callbacks)
            .finish()
    }
}

impl CodeInput {
    /// Create an unmounted input.
    pub fn new(config: CodeInputConfig) -> Self {
        let mut buffer = CodeBuffer::new(config.effective_code_length(), config.restrict_to_numbers);
        buffer.replace(&config.value);
        let engine = AnimationEngine::new(config.animated, config.pulse);
        Self {
            reveal: RevealTimer::new(config.mask_delay),
            buffer,
            focus: FocusTracker::new(),
            callbacks: CodeInputCallbacks::new(),
            shared: Shared::new(engine),
            config,
        }
    }

    /// Register owner callbacks (builder).
    #[must_use]
    pub fn with_callbacks(mut self, callbacks: CodeInputCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// A control handle for the owner.
    pub fn handle(&self) -> CodeInputHandle {
        CodeInputHandle::new(&self.shared)
    }

    /// The configuration in effect.
    pub fn config(&self) -> &CodeInputConfig {
        &self.config
    }

    // --- Lifecycle ---

    /// Attach the entry surface. Focuses it when `auto_focus` is set.
    ///
    /// Mounting again replaces the previous surface.
    pub fn mount(&mut self, surface: impl EntrySurface + 'static) {
        let mut shared = self.shared.borrow_mut();
        shared.surface = Some(Box::new(surface));
        shared.mounted = true;
        shared.engine.sync_pulse(self.focus.is_focused());
        if self.config.auto_focus
            && let Some(surface) = shared.surface.as_deref_mut()
        {
            surface.focus();
        }
        codecell_core::info!(code_length = self.buffer.code_length(), "code input mounted");
    }

    /// Detach the surface and cancel everything pending.
    ///
    /// Focus is forgotten without firing `on_blur`; the surface that held it
    /// is gone.
    pub fn unmount(&mut self) {
        if !self.is_mounted() {
            return;
        }
        self.reveal.cancel();
        self.focus = FocusTracker::new();
        let mut shared = self.shared.borrow_mut();
        shared.engine.shutdown();
        shared.surface = None;
        shared.mounted = false;
        codecell_core::debug!("code input unmounted");
    }

    /// Whether a surface is attached.
    pub fn is_mounted(&self) -> bool {
        self.shared.try_borrow().is_ok_and(|shared| shared.mounted)
    }

    // --- Entry surface notifications ---

    /// Dispatch a surface notification. Returns `true` if visible state may
    /// have changed.
    pub fn handle_event(&mut self, event: &EntryEvent) -> bool {
        let _span = codecell_core::trace_span!("code_input.event").entered();
        match event {
            EntryEvent::TextChanged(text) => self.on_text_change(text),
            EntryEvent::Key(key) => {
                self.on_key(key);
                false
            }
            EntryEvent::FocusGained => {
                self.on_focus_change(FocusChange::Gained);
                true
            }
            EntryEvent::FocusLost => {
                self.on_focus_change(FocusChange::Lost);
                true
            }
        }
    }

    /// The surface's text changed to `raw`.
    ///
    /// Fires `on_text_change`, then `on_fulfill` if the code is complete,
    /// then opens the reveal window if a character was added in password
    /// mode.
    pub fn on_text_change(&mut self, raw: &str) -> bool {
        if !self.config.editable {
            return false;
        }
        self.submit(raw);
        true
    }

    fn submit(&mut self, raw: &str) {
        let submission = self.buffer.submit(raw);

        self.callbacks.text_changed(self.buffer.value());
        if submission.fulfilled {
            codecell_core::debug!(len = submission.len, "code fulfilled");
            self.callbacks.fulfilled(self.buffer.value());
        }

        let reveal = self.config.password && submission.grew() && !self.buffer.is_empty();
        self.reveal.schedule(reveal);
    }

    /// A key notification. Only a delete on an empty value is acted upon.
    pub fn on_key(&mut self, key: &KeyEvent) {
        if !self.config.editable {
            return;
        }
        if key.is_delete() && self.buffer.is_empty() {
            codecell_core::trace!("backspace on empty code");
            self.callbacks.backspace();
        }
    }

    /// A focus notification.
    pub fn on_focus_change(&mut self, change: FocusChange) {
        self.focus.apply(change);
        self.shared
            .borrow_mut()
            .engine
            .sync_pulse(self.focus.is_focused());
        match change {
            FocusChange::Gained => self.callbacks.focused(),
            FocusChange::Lost => self.callbacks.blurred(),
        }
    }

    // --- Owner operations ---

    /// Advance the reveal deadline and both animation channels.
    pub fn tick(&mut self, dt: Duration) {
        self.reveal.tick(dt);
        self.shared.borrow_mut().engine.tick(dt);
    }

    /// Replace the value without firing callbacks or opening a reveal window.
    pub fn set_value(&mut self, value: &str) {
        self.buffer.replace(value);
        self.reveal.cancel();
    }

    /// Empty the value (firing `on_text_change`) and clear the surface.
    /// Works on non-editable inputs too.
    pub fn clear(&mut self) {
        self.submit("");
        if let Some(surface) = self.shared.borrow_mut().surface.as_deref_mut() {
            surface.clear();
        }
    }

    /// Turn animations on or off at runtime.
    pub fn set_animated(&mut self, animated: bool) {
        self.config.animated = animated;
        self.shared
            .borrow_mut()
            .engine
            .set_animated(animated, self.focus.is_focused());
    }

    // --- Queries ---

    /// The current code.
    pub fn value(&self) -> &str {
        self.buffer.value()
    }

    /// The code buffer.
    pub fn buffer(&self) -> &CodeBuffer {
        &self.buffer
    }

    /// Whether the surface has focus.
    pub fn is_focused(&self) -> bool {
        self.focus.is_focused()
    }

    /// Whether the newest character is shown unmasked.
    pub fn is_revealing(&self) -> bool {
        self.reveal.is_revealing()
    }

    /// Index of the next cell to fill, `None` when full.
    pub fn active_index(&self) -> Option<usize> {
        self.buffer.active_index()
    }

    /// Current pulse scale (`1.0` when idle).
    pub fn pulse_scale(&self) -> f32 {
        self.shared.borrow().engine.pulse_scale()
    }

    /// Current shake offset (`0.0` when idle).
    pub fn shake_offset(&self) -> f32 {
        self.shared.borrow().engine.shake_offset()
    }

    /// Resolve the row for this frame.
    pub fn view(&self) -> RowView {
        let _span =
            codecell_core::trace_span!("code_input.view", cells = self.buffer.code_length()).entered();
        let (pulse_scale, shake_offset) = {
            let shared = self.shared.borrow();
            (shared.engine.pulse_scale(), shared.engine.shake_offset())
        };
        render_row(
            &self.buffer,
            &self.config,
            RowState {
                focused: self.focus.is_focused(),
                revealing: self.reveal.is_revealing(),
                pulse_scale,
                shake_offset,
            },
        )
    }
}

impl Drop for CodeInput {
    fn drop(&mut self) {
        self.reveal.cancel();
        if let Ok(mut shared) = self.shared.try_borrow_mut() {
            shared.engine.shutdown();
            shared.surface = None;
            shared.mounted = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codecell_core::event::KeyCode;
    use std::cell::Cell;

    #[derive(Default)]
    struct SurfaceLog {
        focus: Cell<u32>,
        blur: Cell<u32>,
        clear: Cell<u32>,
    }

    struct FakeSurface(Rc<SurfaceLog>);

    impl EntrySurface for FakeSurface {
        fn focus(&mut self) {
            self.0.focus.set(self.0.focus.get() + 1);
        }
        fn blur(&mut self) {
            self.0.blur.set(self.0.blur.get() + 1);
        }
        fn clear(&mut self) {
            self.0.clear.set(self.0.clear.get() + 1);
        }
    }

    fn counter() -> (Rc<Cell<u32>>, impl FnMut() + 'static) {
        let count = Rc::new(Cell::new(0));
        let inner = Rc::clone(&count);
        (count, move || inner.set(inner.get() + 1))
    }

    #[test]
    fn initial_value_is_normalized() {
        let input = CodeInput::new(
            CodeInputConfig::new()
                .with_value("9x87654")
                .with_restrict_to_numbers(true),
        );
        assert_eq!(input.value(), "9876");
    }

    #[test]
    fn auto_focus_focuses_surface_on_mount() {
        let log = Rc::new(SurfaceLog::default());
        let mut input = CodeInput::new(CodeInputConfig::new().with_auto_focus(true));
        input.mount(FakeSurface(Rc::clone(&log)));
        assert_eq!(log.focus.get(), 1);
        assert!(input.is_mounted());
    }

    #[test]
    fn handle_forwards_to_surface() {
        let log = Rc::new(SurfaceLog::default());
        let mut input = CodeInput::new(CodeInputConfig::new());
        let handle = input.handle();
        assert!(!handle.has_surface());

        input.mount(FakeSurface(Rc::clone(&log)));
        assert!(handle.has_surface());
        handle.focus();
        handle.blur();
        handle.clear();
        assert_eq!((log.focus.get(), log.blur.get(), log.clear.get()), (1, 1, 1));
    }

    #[test]
    fn handle_calls_without_surface_are_noops() {
        let input = CodeInput::new(CodeInputConfig::new());
        let handle = input.handle();
        handle.focus();
        handle.blur();
        handle.clear();
        assert!(handle.is_alive());
    }

    #[test]
    fn non_editable_ignores_edits_and_keys() {
        let (backspaces, on_backspace) = counter();
        let mut input = CodeInput::new(CodeInputConfig::new().with_editable(false))
            .with_callbacks(CodeInputCallbacks::new().on_backspace(on_backspace));
        assert!(!input.on_text_change("12"));
        input.on_key(&KeyEvent::new(KeyCode::Backspace));
        assert_eq!(input.value(), "");
        assert_eq!(backspaces.get(), 0);
    }

    #[test]
    fn focus_callbacks_fire_every_time() {
        let (focuses, on_focus) = counter();
        let (blurs, on_blur) = counter();
        let mut input = CodeInput::new(CodeInputConfig::new()).with_callbacks(
            CodeInputCallbacks::new()
                .on_focus(on_focus)
                .on_blur(on_blur),
        );
        input.handle_event(&EntryEvent::FocusGained);
        input.handle_event(&EntryEvent::FocusGained);
        input.handle_event(&EntryEvent::FocusLost);
        assert_eq!(focuses.get(), 2);
        assert_eq!(blurs.get(), 1);
        assert!(!input.is_focused());
    }

    #[test]
    fn set_value_is_silent() {
        let (changes, on_change) = counter();
        let mut on_change = on_change;
        let mut input = CodeInput::new(CodeInputConfig::new().with_password(true))
            .with_callbacks(CodeInputCallbacks::new().on_text_change(move |_| on_change()));
        input.set_value("12");
        assert_eq!(input.value(), "12");
        assert_eq!(changes.get(), 0);
        assert!(!input.is_revealing());
    }

    #[test]
    fn clear_empties_value_and_surface() {
        let log = Rc::new(SurfaceLog::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut input = CodeInput::new(CodeInputConfig::new()).with_callbacks(
            CodeInputCallbacks::new().on_text_change(move |code| sink.borrow_mut().push(code.to_string())),
        );
        input.mount(FakeSurface(Rc::clone(&log)));
        input.on_text_change("12");
        input.clear();
        assert_eq!(input.value(), "");
        assert_eq!(log.clear.get(), 1);
        assert_eq!(*seen.borrow(), vec!["12".to_string(), String::new()]);
    }

    #[test]
    fn unmount_cancels_pending_work() {
        let mut input = CodeInput::new(CodeInputConfig::new().with_password(true));
        input.mount(FakeSurface(Rc::new(SurfaceLog::default())));
        input.on_focus_change(FocusChange::Gained);
        input.on_text_change("1");
        let mut shake = input.handle().shake();
        input.tick(Duration::from_millis(30));

        input.unmount();
        assert!(!input.is_revealing());
        assert_eq!(input.pulse_scale(), 1.0);
        assert_eq!(input.shake_offset(), 0.0);
        assert_eq!(shake.try_result(), Some(Err(AnimateError::Cancelled)));
        assert!(!input.handle().has_surface());
    }

    #[test]
    fn drop_settles_outstanding_shake() {
        let mut input = CodeInput::new(CodeInputConfig::new());
        input.mount(FakeSurface(Rc::new(SurfaceLog::default())));
        let handle = input.handle();
        let mut shake = handle.shake();
        assert!(!shake.is_settled());
        drop(input);
        assert_eq!(shake.try_result(), Some(Err(AnimateError::Cancelled)));
        assert!(!handle.is_alive());
        assert_eq!(
            handle.shake().try_result(),
            Some(Err(AnimateError::Cancelled))
        );
    }

    #[test]
    fn runtime_disable_stops_animation() {
        let mut input = CodeInput::new(CodeInputConfig::new());
        input.mount(FakeSurface(Rc::new(SurfaceLog::default())));
        input.on_focus_change(FocusChange::Gained);
        input.tick(Duration::from_millis(100));
        assert!(input.pulse_scale() > 1.0);

        input.set_animated(false);
        assert_eq!(input.pulse_scale(), 1.0);
        assert_eq!(
            input.handle().shake().try_result(),
            Some(Err(AnimateError::Disabled))
        );
    }

    #[test]
    fn unmount_forgets_focus_silently() {
        let (blurs, on_blur) = counter();
        let mut input = CodeInput::new(CodeInputConfig::new())
            .with_callbacks(CodeInputCallbacks::new().on_blur(on_blur));
        input.mount(FakeSurface(Rc::new(SurfaceLog::default())));
        input.on_focus_change(FocusChange::Gained);
        input.tick(Duration::from_millis(100));
        assert!(input.pulse_scale() > 1.0);

        input.unmount();
        assert!(!input.is_focused());
        assert_eq!(blurs.get(), 0);

        input.mount(FakeSurface(Rc::new(SurfaceLog::default())));
        input.tick(Duration::from_millis(100));
        assert_eq!(input.pulse_scale(), 1.0);
        assert!(input.view().cells.iter().all(|cell| !cell.focused));
    }

    #[test]
    fn remount_resumes_pulse_for_focused_surface() {
        let mut input = CodeInput::new(CodeInputConfig::new());
        input.mount(FakeSurface(Rc::new(SurfaceLog::default())));
        input.unmount();
        input.mount(FakeSurface(Rc::new(SurfaceLog::default())));
        input.on_focus_change(FocusChange::Gained);
        input.tick(Duration::from_millis(100));
        assert!(input.pulse_scale() > 1.0);
    }

    #[test]
    fn animate_while_unmounted_is_cancelled() {
        let mut input = CodeInput::new(CodeInputConfig::new());
        let handle = input.handle();
        assert_eq!(handle.shake().try_result(), Some(Err(AnimateError::Cancelled)));

        input.mount(FakeSurface(Rc::new(SurfaceLog::default())));
        input.unmount();
        let mut late = handle.shake();
        input.tick(Duration::from_millis(16));
        assert_eq!(input.shake_offset(), 0.0);
        assert_eq!(late.try_result(), Some(Err(AnimateError::Cancelled)));

        input.mount(FakeSurface(Rc::new(SurfaceLog::default())));
        let mut shake = handle.shake();
        assert!(!shake.is_settled());
        input.tick(Duration::from_millis(16));
        assert!(input.shake_offset() != 0.0);
    }
}
