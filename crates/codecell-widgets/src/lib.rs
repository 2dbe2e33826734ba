#![forbid(unsafe_code)]

//! Widgets for codecell.
//!
//! Currently a single widget: [`code_input::CodeInput`], a row of cells for
//! entering a PIN or one-time code.

pub mod code_input;

pub use code_input::{CodeInput, CodeInputCallbacks, CodeInputConfig, CodeInputHandle};
