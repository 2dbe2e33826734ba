#![forbid(unsafe_code)]

//! Focus state mirrored from the entry surface.

/// Edge of a focus notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusChange {
    /// Focus was gained.
    Gained,
    /// Focus was lost.
    Lost,
}

/// Whether the entry surface currently has focus.
///
/// Every notification is applied as-is; repeated gains or losses are not
/// collapsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusTracker {
    focused: bool,
}

impl FocusTracker {
    /// Unfocused.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Apply a notification.
    pub fn apply(&mut self, change: FocusChange) {
        self.focused = change == FocusChange::Gained;
    }
}
