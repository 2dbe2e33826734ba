#![forbid(unsafe_code)]

//! Per-cell view resolution.
//!
//! [`render_row`] is a pure function of the buffer, focus, reveal window,
//! configuration, and the two channel values. It decides what each cell
//! shows and which style layers apply; drawing is left to the host.
//!
//! Content resolution for cell `i`:
//!
//! 1. Unfilled with a placeholder configured: the placeholder.
//! 2. Unfilled otherwise: empty.
//! 3. Filled, password mode, and either not the last filled cell or the
//!    reveal window is closed: the mask.
//! 4. Filled otherwise: the character.

use codecell_style::{Style, StyleStack};

use super::buffer::CodeBuffer;
use super::config::{Adornment, CodeInputConfig, ElementKey};

/// What a cell displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellContent {
    /// The typed character.
    Character(String),
    /// A text mask glyph.
    MaskGlyph(String),
    /// Host-rendered mask content.
    MaskCustom(ElementKey),
    /// Placeholder text.
    PlaceholderText(String),
    /// Host-rendered placeholder content.
    PlaceholderCustom(ElementKey),
    /// Nothing.
    Empty,
}

impl CellContent {
    fn mask(mask: &Adornment) -> Self {
        match mask {
            Adornment::Text(glyph) => Self::MaskGlyph(glyph.clone()),
            Adornment::Custom(key) => Self::MaskCustom(key.clone()),
        }
    }

    fn placeholder(placeholder: &Adornment) -> Self {
        match placeholder {
            Adornment::Text(text) => Self::PlaceholderText(text.clone()),
            Adornment::Custom(key) => Self::PlaceholderCustom(key.clone()),
        }
    }

    /// Text to draw, if this content is textual.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Character(s) | Self::MaskGlyph(s) | Self::PlaceholderText(s) => Some(s),
            Self::MaskCustom(_) | Self::PlaceholderCustom(_) | Self::Empty => None,
        }
    }

    /// Whether the content is a mask.
    pub fn is_masked(&self) -> bool {
        matches!(self, Self::MaskGlyph(_) | Self::MaskCustom(_))
    }
}

/// One resolved cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellView {
    /// Position in the row.
    pub index: usize,
    /// Holds a character.
    pub filled: bool,
    /// Is the active cell and the input is focused.
    pub focused: bool,
    /// What to display.
    pub content: CellContent,
    /// Resolved cell style.
    pub cell_style: Style,
    /// Resolved text style.
    pub text_style: Style,
    /// Scale transform; the pulse value on the focused cell, `1.0` elsewhere.
    pub scale: f32,
}

/// The whole row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    /// Cells in display order.
    pub cells: Vec<CellView>,
    /// Horizontal offset from the shake channel.
    pub offset_x: f32,
    /// Resolved container style.
    pub style: Style,
}

impl RowView {
    /// Text of every textual cell, `' '` standing in for anything else.
    /// Handy for tests and terminal hosts.
    pub fn text(&self) -> String {
        self.cells
            .iter()
            .map(|cell| cell.content.text().unwrap_or(" "))
            .collect()
    }
}

/// Inputs that change frame to frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowState {
    /// The entry surface has focus.
    pub focused: bool,
    /// The reveal window is open.
    pub revealing: bool,
    /// Current pulse scale.
    pub pulse_scale: f32,
    /// Current shake offset.
    pub shake_offset: f32,
}

/// Resolve every cell.
pub fn render_row(buffer: &CodeBuffer, config: &CodeInputConfig, state: RowState) -> RowView {
    let chars: Vec<&str> = buffer.chars().collect();
    let last_filled = chars.len().checked_sub(1);
    let active = buffer.active_index();
    let styles = &config.styles;

    let cells = (0..buffer.code_length())
        .map(|index| {
            let filled = index < chars.len();
            let focused = state.focused && active == Some(index);

            let content = match chars.get(index) {
                None => config
                    .placeholder
                    .as_ref()
                    .map_or(CellContent::Empty, CellContent::placeholder),
                Some(ch) => {
                    let spared = Some(index) == last_filled && state.revealing;
                    if config.password && !spared {
                        CellContent::mask(&config.mask)
                    } else {
                        CellContent::Character((*ch).to_string())
                    }
                }
            };

            let cell_style = StyleStack::new()
                .push(&styles.cell)
                .push_if(focused, &styles.cell_focused)
                .push_if(filled, &styles.cell_filled)
                .resolve();
            let text_style = StyleStack::new()
                .push(&styles.text)
                .push_if(focused, &styles.text_focused)
                .resolve();

            CellView {
                index,
                filled,
                focused,
                content,
                cell_style,
                text_style,
                scale: if focused { state.pulse_scale } else { 1.0 },
            }
        })
        .collect();

    RowView {
        cells,
        offset_x: state.shake_offset,
        style: StyleStack::new().push(&styles.container).resolve(),
    }
}
