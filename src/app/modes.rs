//! UI mode derived from overlay flags.
//!
//! The state stores overlays as independent flags because the original
//! surfaces can stack (a sign-in modal over the docs filter, for instance).
//! Key routing needs a single answer to "who owns the arrow keys right now",
//! which [`UiMode`] provides.
//!
//! # Precedence
//!
//! 1. **HistoryPreview**: up/down browse history, enter selects a query
//! 2. **ResultModal**: the modal scrolls its own content; result navigation is suppressed
//! 3. **DocsFilter**: the doc-source overlay owns the keys
//! 4. **SignIn**: the sign-in modal owns the keys
//! 5. **Results**: up/down move the cursor in the active bucket
//!
//! # Example
//!
//! ```rust
//! use devsearch::app::{State, UiMode};
//!
//! let state = State::default();
//! assert_eq!(state.ui_mode(), UiMode::Results);
//! assert!(state.ui_mode().navigates_results());
//! ```

/// Surface that currently receives directional input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    /// Result list of the active filter.
    Results,

    /// Search history preview.
    ///
    /// Mutually exclusive with result navigation: while visible, up/down move
    /// the history cursor and never the result cursor.
    HistoryPreview,

    /// Detail modal of a Q&A or Code result.
    ResultModal,

    /// Doc-source include/exclude overlay.
    DocsFilter,

    /// Sign-in prompt.
    SignIn,
}

impl UiMode {
    /// Whether up/down should move the result cursor.
    #[must_use]
    pub const fn navigates_results(self) -> bool {
        matches!(self, Self::Results | Self::SignIn)
    }
}
