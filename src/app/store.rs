//! Owned state container.

use super::actions::Action;
use super::reducer::reduce;
use super::state::State;

/// Holds the single [`State`] and applies actions through the reducer.
///
/// There is no global instance: whoever owns the `Store` is the only writer.
/// Readers borrow a snapshot through [`Store::state`].
#[derive(Debug, Default)]
pub struct Store {
    state: State,
}

impl Store {
    #[must_use]
    pub const fn new(state: State) -> Self {
        Self { state }
    }

    #[must_use]
    pub const fn state(&self) -> &State {
        &self.state
    }

    /// Applies one action.
    pub fn dispatch(&mut self, action: Action) {
        let _span = tracing::trace_span!("dispatch", action = ?action).entered();
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, &action);
    }

    /// Applies actions in order.
    pub fn dispatch_all(&mut self, actions: impl IntoIterator<Item = Action>) {
        for action in actions {
            self.dispatch(action);
        }
    }
}
