//! Keyboard and pointer navigation within the active result bucket.
//!
//! The tracker reads a state snapshot and returns the [`Action`] to dispatch,
//! or `None` when the move is a no-op. Bounds are checked here so the reducer
//! can apply `FocusItem` without clamping.

use super::actions::Action;
use super::state::{FocusIntent, State};
use crate::domain::Filter;

/// Direction of a single-step move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Moves the active bucket's cursor one row.
///
/// Returns `None` at either end of the list, on an empty bucket, and while
/// another surface owns the arrow keys (result modal, docs filter overlay,
/// history preview).
///
/// ```
/// use devsearch::app::{navigate, Direction, State};
///
/// let state = State::default();
/// assert_eq!(navigate(&state, Direction::Down), None);
/// ```
#[must_use]
pub fn navigate(state: &State, direction: Direction) -> Option<Action> {
    if !state.ui_mode().navigates_results() {
        return None;
    }

    let filter = state.search.filter;
    let bucket = &state.results[filter];
    let current = bucket.focused.index;

    let index = match direction {
        Direction::Up => current.checked_sub(1)?,
        Direction::Down => {
            let next = current + 1;
            if next >= bucket.len() {
                return None;
            }
            next
        }
    };

    Some(Action::FocusItem {
        filter,
        index,
        intent: FocusIntent::WithScroll,
    })
}

/// Focuses a row picked directly, typically by the pointer.
///
/// Out-of-range indices are rejected. Pointer selection never scrolls.
#[must_use]
pub fn select_direct(state: &State, filter: Filter, index: usize) -> Option<Action> {
    (index < state.results[filter].len()).then_some(Action::FocusItem {
        filter,
        index,
        intent: FocusIntent::NoScroll,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::reduce;
    use crate::domain::{DocResult, ResultItem};

    fn docs(n: usize) -> Vec<ResultItem> {
        (0..n)
            .map(|i| {
                ResultItem::Doc(DocResult {
                    id: format!("page-{i}"),
                    title: format!("Page {i}"),
                    page_url: format!("https://example.com/{i}"),
                    doc_source_slug: "mdn".into(),
                    excerpt: String::new(),
                })
            })
            .collect()
    }

    fn with_docs(n: usize) -> State {
        let state = reduce(State::default(), &Action::SetFilter(Filter::Docs));
        reduce(
            state,
            &Action::SearchSucceeded {
                filter: Filter::Docs,
                items: docs(n),
            },
        )
    }

    #[test]
    fn moves_are_no_ops_at_the_edges() {
        let state = with_docs(2);
        assert_eq!(navigate(&state, Direction::Up), None);

        let action = navigate(&state, Direction::Down);
        assert_eq!(
            action,
            Some(Action::FocusItem {
                filter: Filter::Docs,
                index: 1,
                intent: FocusIntent::WithScroll,
            })
        );

        let state = reduce(state, &action.expect("cursor can move down"));
        assert_eq!(navigate(&state, Direction::Down), None);
    }

    #[test]
    fn empty_bucket_never_moves() {
        let state = with_docs(0);
        assert_eq!(navigate(&state, Direction::Down), None);
        assert_eq!(navigate(&state, Direction::Up), None);
    }

    #[test]
    fn suppressed_while_overlay_is_open() {
        let state = reduce(with_docs(3), &Action::OpenDocsFilterModal);
        assert_eq!(navigate(&state, Direction::Down), None);
    }

    #[test]
    fn direct_selection_is_bounds_checked() {
        let state = with_docs(3);
        assert_eq!(select_direct(&state, Filter::Docs, 3), None);
        assert_eq!(
            select_direct(&state, Filter::Docs, 2),
            Some(Action::FocusItem {
                filter: Filter::Docs,
                index: 2,
                intent: FocusIntent::NoScroll,
            })
        );
    }
}
