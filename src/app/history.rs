//! Search history ring: recording, browsing and selecting past queries.
//!
//! Entries are kept most recent last. Recording only appends; removing
//! duplicates and bounding the length is left to the
//! [`PreferencesStore`](crate::storage::PreferencesStore), whose answer is
//! dispatched back as `SetHistory`.

use super::actions::Action;
use super::focus::Direction;
use super::state::State;

/// Appends a trimmed, non-empty query to `entries`.
///
/// Returns `None` when there is nothing to record.
///
/// ```
/// use devsearch::app::history::record;
///
/// let entries = record(&["tokio".to_string()], "  serde  ").unwrap_or_default();
/// assert_eq!(entries, vec!["tokio", "serde"]);
/// assert!(record(&entries, "   ").is_none());
/// ```
#[must_use]
pub fn record(entries: &[String], query: &str) -> Option<Vec<String>> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    let mut next = entries.to_vec();
    next.push(query.to_string());
    Some(next)
}

/// Moves the preview cursor one entry, clamped to the list.
///
/// Only meaningful while the preview is visible.
#[must_use]
pub fn browse(state: &State, direction: Direction) -> Option<Action> {
    let history = &state.history;
    if !history.is_preview_visible || history.entries.is_empty() {
        return None;
    }

    let last = history.entries.len() - 1;
    let index = match direction {
        Direction::Up => history.browse_index.saturating_sub(1),
        Direction::Down => (history.browse_index + 1).min(last),
    };

    (index != history.browse_index).then_some(Action::SetHistoryBrowseIndex(index))
}

/// Picks an entry as the new live query.
///
/// Returns the actions that set the query and close the preview, together
/// with the query itself so the caller can feed it to the query debouncer.
#[must_use]
pub fn select(state: &State, index: usize) -> Option<(String, Vec<Action>)> {
    let query = state.history.entries.get(index)?.clone();
    let actions = vec![
        Action::SetHistoryBrowseIndex(index),
        Action::SetQuery(query.clone()),
        Action::ToggleHistoryPreview(false),
    ];
    Some((query, actions))
}
