#![forbid(unsafe_code)]

//! The owner-facing control surface.
//!
//! A [`CodeInputHandle`] is a cheap, cloneable capability the owner keeps
//! next to (or inside callbacks of) a [`CodeInput`](super::CodeInput). It
//! holds only a weak reference: once the input is dropped every call becomes
//! a no-op, and `animate` fails with [`AnimateError::Cancelled`]. The same
//! holds while the input is unmounted.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use super::engine::{AnimateError, AnimateOptions, AnimationEngine, AnimationResult};
use codecell_core::deferred::Deferred;

/// The hidden text-entry primitive a code input is layered over.
///
/// Implementations forward to whatever actually owns keyboard focus. Each
/// resulting notification (text change, focus, blur) is reported back to
/// the input by the host, not by the surface.
pub trait EntrySurface {
    /// Request input focus.
    fn focus(&mut self);

    /// Release input focus.
    fn blur(&mut self);

    /// Empty the surface's text.
    fn clear(&mut self);
}

/// State shared between an input and its handles.
pub(crate) struct Shared {
    pub(crate) engine: AnimationEngine,
    pub(crate) surface: Option<Box<dyn EntrySurface>>,
    pub(crate) mounted: bool,
}

impl Shared {
    pub(crate) fn new(engine: AnimationEngine) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            engine,
            surface: None,
            mounted: false,
        }))
    }
}

/// Imperative controls for a mounted code input.
#[derive(Clone)]
pub struct CodeInputHandle {
    shared: Weak<RefCell<Shared>>,
}

impl fmt::Debug for CodeInputHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeInputHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

impl CodeInputHandle {
    pub(crate) fn new(shared: &Rc<RefCell<Shared>>) -> Self {
        Self {
            shared: Rc::downgrade(shared),
        }
    }

    /// Whether the input still exists.
    pub fn is_alive(&self) -> bool {
        self.shared.strong_count() > 0
    }

    /// Whether an entry surface is attached.
    pub fn has_surface(&self) -> bool {
        let Some(shared) = self.shared.upgrade() else {
            return false;
        };
        match shared.try_borrow() {
            Ok(state) => state.surface.is_some(),
            Err(_) => false,
        }
    }

    /// Play an animation. See [`AnimationEngine::animate`].
    pub fn animate(&self, options: AnimateOptions) -> AnimationResult {
        let Some(shared) = self.shared.upgrade() else {
            return Deferred::rejected(AnimateError::Cancelled);
        };
        let Ok(mut shared) = shared.try_borrow_mut() else {
            codecell_core::warn!("animate called re-entrantly; ignoring");
            return Deferred::rejected(AnimateError::Cancelled);
        };
        if !shared.mounted {
            codecell_core::debug!("animate called while unmounted");
            return Deferred::rejected(AnimateError::Cancelled);
        }
        let _span = codecell_core::debug_span!("code_input.animate").entered();
        shared.engine.animate(&options)
    }

    /// Play the default shake.
    pub fn shake(&self) -> AnimationResult {
        self.animate(AnimateOptions::shake())
    }

    /// Focus the entry surface.
    pub fn focus(&self) {
        self.with_surface(|surface| surface.focus());
    }

    /// Blur the entry surface.
    pub fn blur(&self) {
        self.with_surface(|surface| surface.blur());
    }

    /// Clear the entry surface.
    pub fn clear(&self) {
        self.with_surface(|surface| surface.clear());
    }

    fn with_surface(&self, f: impl FnOnce(&mut dyn EntrySurface)) {
        let Some(shared) = self.shared.upgrade() else {
            return;
        };
        let Ok(mut shared) = shared.try_borrow_mut() else {
            return;
        };
        if let Some(surface) = shared.surface.as_deref_mut() {
            f(surface);
        }
    }
}
