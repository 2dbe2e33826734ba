#![forbid(unsafe_code)]

//! Owner callbacks.

use std::fmt;

type TextFn = Box<dyn FnMut(&str)>;
type NotifyFn = Box<dyn FnMut()>;

/// Closures the owner registers to hear about edits and focus.
///
/// Every callback is optional. Callbacks run synchronously inside the
/// notification that triggered them and may freely use a
/// [`CodeInputHandle`](super::CodeInputHandle), e.g. to shake on a wrong
/// code from `on_fulfill`.
#[derive(Default)]
pub struct CodeInputCallbacks {
    on_text_change: Option<TextFn>,
    on_fulfill: Option<TextFn>,
    on_backspace: Option<NotifyFn>,
    on_focus: Option<NotifyFn>,
    on_blur: Option<NotifyFn>,
}

impl fmt::Debug for CodeInputCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeInputCallbacks")
            .field("on_text_change", &self.on_text_change.is_some())
            .field("on_fulfill", &self.on_fulfill.is_some())
            .field("on_backspace", &self.on_backspace.is_some())
            .field("on_focus", &self.on_focus.is_some())
            .field("on_blur", &self.on_blur.is_some())
            .finish()
    }
}

impl CodeInputCallbacks {
    /// No callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the new value after every text change.
    #[must_use]
    pub fn on_text_change(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.on_text_change = Some(Box::new(f));
        self
    }

    /// Called with the full code whenever the value reaches the code length.
    #[must_use]
    pub fn on_fulfill(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.on_fulfill = Some(Box::new(f));
        self
    }

    /// Called when delete is pressed on an empty value.
    #[must_use]
    pub fn on_backspace(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_backspace = Some(Box::new(f));
        self
    }

    /// Called on every focus gain.
    #[must_use]
    pub fn on_focus(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_focus = Some(Box::new(f));
        self
    }

    /// Called on every focus loss.
    #[must_use]
    pub fn on_blur(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_blur = Some(Box::new(f));
        self
    }

    pub(crate) fn text_changed(&mut self, code: &str) {
        if let Some(f) = self.on_text_change.as_mut() {
            f(code);
        }
    }

    pub(crate) fn fulfilled(&mut self, code: &str) {
        if let Some(f) = self.on_fulfill.as_mut() {
            f(code);
        }
    }

    pub(crate) fn backspace(&mut self) {
        if let Some(f) = self.on_backspace.as_mut() {
            f();
        }
    }

    pub(crate) fn focused(&mut self) {
        if let Some(f) = self.on_focus.as_mut() {
            f();
        }
    }

    pub(crate) fn blurred(&mut self) {
        if let Some(f) = self.on_blur.as_mut() {
            f();
        }
    }
}
