#![forbid(unsafe_code)]

//! Ordered style composition.
//!
//! A [`StyleStack`] is a list of layers applied bottom to top. Later layers
//! override earlier ones property by property; layers can be pushed
//! conditionally so that state-dependent variants (focused, filled) read as
//! a flat list at the call site:
//!
//! ```
//! use codecell_style::{Rgba, Style, StyleStack};
//!
//! let base = Style::new().border(Rgba::BLACK).border_width(1.0);
//! let focused = Style::new().border(Rgba::WHITE);
//!
//! let resolved = StyleStack::new()
//!     .push(&base)
//!     .push_if(true, &focused)
//!     .resolve();
//! assert_eq!(resolved.border, Some(Rgba::WHITE));
//! assert_eq!(resolved.border_width, Some(1.0));
//! ```

use crate::style::Style;

/// Bottom-to-top list of style layers.
#[derive(Debug, Clone, Default)]
pub struct StyleStack<'a> {
    layers: Vec<&'a Style>,
}

impl<'a> StyleStack<'a> {
    /// An empty stack; resolves to [`Style::new`].
    #[must_use]
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Add a layer on top.
    #[must_use]
    pub fn push(mut self, layer: &'a Style) -> Self {
        self.layers.push(layer);
        self
    }

    /// Add a layer on top when `condition` holds.
    #[must_use]
    pub fn push_if(self, condition: bool, layer: &'a Style) -> Self {
        if condition { self.push(layer) } else { self }
    }

    /// Number of layers pushed.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether no layer was pushed.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Flatten the stack into a single style.
    pub fn resolve(&self) -> Style {
        self.layers
            .iter()
            .fold(Style::new(), |below, layer| layer.merge(&below))
    }
}
