#![forbid(unsafe_code)]

//! Core: frame-driven animation primitives, deferred results, and key events.

pub mod animation;
pub mod deferred;
pub mod event;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, info, trace, trace_span, warn};
