#![forbid(unsafe_code)]

//! The [`Style`] descriptor.
//!
//! Every property is optional. An unset property means "inherit from the
//! layer below", which is what makes ordered composition work: a focused
//! cell style only needs to mention the border it changes.

use bitflags::bitflags;

use crate::color::Rgba;

bitflags! {
    /// Text attribute flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct StyleFlags: u8 {
        /// Bold / increased weight.
        const BOLD      = 0b0000_0001;
        /// Dim / decreased intensity.
        const DIM       = 0b0000_0010;
        /// Italic.
        const ITALIC    = 0b0000_0100;
        /// Underline.
        const UNDERLINE = 0b0000_1000;
    }
}

/// A declarative style for one rendered element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Style {
    /// Foreground (text) colour.
    pub fg: Option<Rgba>,
    /// Background colour.
    pub bg: Option<Rgba>,
    /// Border colour.
    pub border: Option<Rgba>,
    /// Border thickness in host units.
    pub border_width: Option<f32>,
    /// Text attributes. Set attributes replace, they do not accumulate.
    pub attrs: Option<StyleFlags>,
}

impl Style {
    /// An empty style; every property inherits.
    #[inline]
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            border: None,
            border_width: None,
            attrs: None,
        }
    }

    /// Set the foreground colour.
    #[must_use]
    pub const fn fg(mut self, color: Rgba) -> Self {
        self.fg = Some(color);
        self
    }

    /// Set the background colour.
    #[must_use]
    pub const fn bg(mut self, color: Rgba) -> Self {
        self.bg = Some(color);
        self
    }

    /// Set the border colour.
    #[must_use]
    pub const fn border(mut self, color: Rgba) -> Self {
        self.border = Some(color);
        self
    }

    /// Set the border thickness.
    #[must_use]
    pub const fn border_width(mut self, width: f32) -> Self {
        self.border_width = Some(width);
        self
    }

    /// Set the text attributes.
    #[must_use]
    pub const fn attrs(mut self, attrs: StyleFlags) -> Self {
        self.attrs = Some(attrs);
        self
    }

    /// Shorthand for bold text.
    #[must_use]
    pub const fn bold(self) -> Self {
        self.attrs(StyleFlags::BOLD)
    }

    /// Whether no property is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::new()
    }

    /// Whether the given attribute is set.
    pub fn has_attr(&self, flag: StyleFlags) -> bool {
        self.attrs.is_some_and(|attrs| attrs.contains(flag))
    }

    /// `self` layered over `base`: properties set on `self` win, unset ones
    /// fall back to `base`.
    #[must_use]
    pub fn merge(&self, base: &Style) -> Style {
        Style {
            fg: self.fg.or(base.fg),
            bg: self.bg.or(base.bg),
            border: self.border.or(base.border),
            border_width: self.border_width.or(base.border_width),
            attrs: self.attrs.or(base.attrs),
        }
    }
}
