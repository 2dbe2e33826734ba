#![forbid(unsafe_code)]

//! Style descriptors for codecell widgets.
//!
//! Widgets never draw; they hand the host a [`Style`] per element, built by
//! stacking layers in a fixed order with [`StyleStack`]. How a host turns a
//! style into pixels or terminal cells is its own business.

pub mod color;
pub mod stack;
pub mod style;

pub use color::Rgba;
pub use stack::StyleStack;
pub use style::{Style, StyleFlags};
