#![forbid(unsafe_code)]

//! Configuration for [`CodeInput`](super::CodeInput).
//!
//! Every field has a default, so hosts only set what they change:
//!
//! ```
//! use std::time::Duration;
//! use codecell_widgets::code_input::CodeInputConfig;
//!
//! let config = CodeInputConfig::new()
//!     .with_code_length(6)
//!     .with_password(true)
//!     .with_mask_delay(Duration::from_millis(300))
//!     .with_restrict_to_numbers(true);
//! assert_eq!(config.code_length, 6);
//! ```
//!
//! With the `serde` feature the config deserializes from any serde format;
//! durations are written in milliseconds.

use std::time::Duration;

use codecell_style::Style;

/// Default number of cells.
pub const DEFAULT_CODE_LENGTH: usize = 4;

/// Default time a freshly typed character stays visible in password mode.
pub const DEFAULT_MASK_DELAY: Duration = Duration::from_millis(200);

/// Opaque identifier of host-provided content (an icon, a rendered element)
/// shown in place of text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ElementKey(pub String);

impl From<&str> for ElementKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

/// What a mask or placeholder shows: plain text, or host content.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Adornment {
    /// A text glyph.
    Text(String),
    /// Host-rendered content.
    Custom(ElementKey),
}

impl Adornment {
    /// A text adornment.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// A host-content adornment.
    pub fn custom(key: impl Into<ElementKey>) -> Self {
        Self::Custom(key.into())
    }
}

impl Default for Adornment {
    fn default() -> Self {
        Self::text("*")
    }
}

/// Focus pulse parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PulseConfig {
    /// Peak scale reached halfway through each cycle.
    pub scale: f32,
    /// Duration of each half cycle.
    #[cfg_attr(feature = "serde", serde(with = "millis"))]
    pub leg: Duration,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            scale: 1.06,
            leg: Duration::from_millis(250),
        }
    }
}

/// Style layers. Cells resolve `[cell, cell_focused?, cell_filled?]` and text
/// resolves `[text, text_focused?]`, later layers winning.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CodeInputStyles {
    /// The row holding every cell.
    pub container: Style,
    /// Every cell.
    pub cell: Style,
    /// The active cell while focused.
    pub cell_focused: Style,
    /// Cells holding a character.
    pub cell_filled: Style,
    /// Text inside every cell.
    pub text: Style,
    /// Text inside the active cell while focused.
    pub text_focused: Style,
}

/// Code input configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CodeInputConfig {
    /// Initial value.
    pub value: String,
    /// Number of cells. Zero is treated as one.
    pub code_length: usize,
    /// Mask filled cells.
    pub password: bool,
    /// What masked cells show.
    pub mask: Adornment,
    /// How long the newest character stays visible in password mode.
    /// Zero disables the reveal window.
    #[cfg_attr(feature = "serde", serde(with = "millis"))]
    pub mask_delay: Duration,
    /// What empty cells show, if anything.
    pub placeholder: Option<Adornment>,
    /// Strip everything but ASCII digits.
    pub restrict_to_numbers: bool,
    /// Master switch for the pulse and shake.
    pub animated: bool,
    /// Focus the entry surface on mount.
    pub auto_focus: bool,
    /// Accept edits. When false, text and key notifications are ignored.
    pub editable: bool,
    /// Focus pulse parameters.
    pub pulse: PulseConfig,
    /// Style layers.
    pub styles: CodeInputStyles,
}

impl Default for CodeInputConfig {
    fn default() -> Self {
        Self {
            value: String::new(),
            code_length: DEFAULT_CODE_LENGTH,
            password: false,
            mask: Adornment::default(),
            mask_delay: DEFAULT_MASK_DELAY,
            placeholder: None,
            restrict_to_numbers: false,
            animated: true,
            auto_focus: false,
            editable: true,
            pulse: PulseConfig::default(),
            styles: CodeInputStyles::default(),
        }
    }
}

impl CodeInputConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cells, at least one.
    pub fn effective_code_length(&self) -> usize {
        self.code_length.max(1)
    }

    /// Set the initial value (builder).
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Set the number of cells (builder).
    #[must_use]
    pub fn with_code_length(mut self, code_length: usize) -> Self {
        self.code_length = code_length;
        self
    }

    /// Enable or disable masking (builder).
    #[must_use]
    pub fn with_password(mut self, password: bool) -> Self {
        self.password = password;
        self
    }

    /// Set the mask (builder).
    #[must_use]
    pub fn with_mask(mut self, mask: Adornment) -> Self {
        self.mask = mask;
        self
    }

    /// Set the reveal window length (builder).
    #[must_use]
    pub fn with_mask_delay(mut self, delay: Duration) -> Self {
        self.mask_delay = delay;
        self
    }

    /// Set the placeholder (builder).
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: Adornment) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    /// Enable or disable digit filtering (builder).
    #[must_use]
    pub fn with_restrict_to_numbers(mut self, restrict: bool) -> Self {
        self.restrict_to_numbers = restrict;
        self
    }

    /// Enable or disable animations (builder).
    #[must_use]
    pub fn with_animated(mut self, animated: bool) -> Self {
        self.animated = animated;
        self
    }

    /// Focus on mount (builder).
    #[must_use]
    pub fn with_auto_focus(mut self, auto_focus: bool) -> Self {
        self.auto_focus = auto_focus;
        self
    }

    /// Accept or ignore edits (builder).
    #[must_use]
    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    /// Set pulse parameters (builder).
    #[must_use]
    pub fn with_pulse(mut self, pulse: PulseConfig) -> Self {
        self.pulse = pulse;
        self
    }

    /// Set style layers (builder).
    #[must_use]
    pub fn with_styles(mut self, styles: CodeInputStyles) -> Self {
        self.styles = styles;
        self
    }
}

#[cfg(feature = "serde")]
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
