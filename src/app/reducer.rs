//! Pure state reducer.
//!
//! [`reduce`] maps the current [`State`] and one [`Action`] to the next state.
//! It performs no I/O, schedules nothing and never panics: an action that
//! references a missing doc source or an out-of-range index simply leaves the
//! corresponding part of the state as it was.

use super::actions::Action;
use super::state::{FocusIntent, FocusedIndex, ResultBuckets, State};

/// Applies one action to the state.
#[allow(clippy::too_many_lines)]
#[must_use]
pub fn reduce(mut state: State, action: &Action) -> State {
    match action {
        Action::SetQuery(query) => {
            state.search.query.clone_from(query);
        }

        Action::SetFilter(filter) => {
            state.search.filter = *filter;
            // Presentation scrolls back to the cursor of the bucket it lands on.
            state.results[*filter].focused.intent = FocusIntent::WithScroll;
        }

        Action::ClearResults => {
            state.search.query.clear();
            state.search.last_searched_query.clear();
            state.results = ResultBuckets::cleared();
        }

        Action::StartSearch(filter) => {
            let bucket = &mut state.results[*filter];
            bucket.items.clear();
            bucket.is_loading = true;
            bucket.failure = None;
        }

        Action::SearchSucceeded { filter, items } => {
            state
                .search
                .last_searched_query
                .clone_from(&state.search.query);
            let bucket = &mut state.results[*filter];
            bucket.items.clone_from(items);
            bucket.is_loading = false;
            bucket.failure = None;
            bucket.focused = FocusedIndex {
                index: 0,
                intent: FocusIntent::NoScroll,
            };
        }

        Action::SearchFailed { filter, message } => {
            state.error_message.clone_from(message);
            let bucket = &mut state.results[*filter];
            bucket.items.clear();
            bucket.is_loading = false;
            bucket.failure = Some(message.clone());
            bucket.focused.index = 0;
        }

        Action::FocusItem {
            filter,
            index,
            intent,
        } => {
            state.results[*filter].focused = FocusedIndex {
                index: *index,
                intent: *intent,
            };
        }

        Action::FocusIntentConsumed(filter) => {
            state.results[*filter].focused.intent = FocusIntent::None;
        }

        Action::CacheScrollTopPosition { filter, position } => {
            state.results[*filter].scroll_top_position = *position;
        }

        Action::OpenModal(item) => {
            state.modal_item = Some(item.clone());
        }

        Action::CloseModal => {
            state.modal_item = None;
        }

        Action::StartConnect => {
            state.account.is_loading = true;
            state.account.is_connected = false;
            state.account.error.clear();
        }

        Action::ConnectSucceeded => {
            state.account.is_loading = false;
            state.account.is_connected = true;
            state.account.error.clear();
        }

        Action::ConnectFailed(message) => {
            state.account.is_loading = false;
            state.account.is_connected = false;
            state.account.error.clone_from(message);
        }

        Action::Disconnect => {
            state.account.is_loading = false;
            state.account.is_connected = false;
            state.account.error.clear();
        }

        Action::SetAccountError(message) => {
            state.account.error.clone_from(message);
        }

        Action::DocSourcesFetched(sources) => {
            state.doc_sources.clone_from(sources);
        }

        Action::DocSourcesFetchFailed(message) => {
            state.error_message.clone_from(message);
        }

        Action::SetDocSourceIncluded { slug, included } => {
            if let Some(source) = state.doc_sources.iter_mut().find(|s| &s.slug == slug) {
                source.is_included_in_search = *included;
            }
        }

        Action::SetResultsPaneWidth(width) => {
            state.layout.results_pane_width = *width;
        }

        Action::SetHistory(entries) => {
            state.history.entries.clone_from(entries);
            let last = state.history.entries.len().saturating_sub(1);
            state.history.browse_index = state.history.browse_index.min(last);
        }

        Action::SetHistoryBrowseIndex(index) => {
            state.history.browse_index = *index;
        }

        Action::ToggleHistoryPreview(visible) => {
            state.history.is_preview_visible = *visible;
            if *visible {
                state.history.browse_index = state.history.entries.len().saturating_sub(1);
            }
        }

        Action::ToggleInputFocus(focused) => {
            state.is_search_input_focused = *focused;
        }

        Action::SearchInDocPage => state.is_searching_in_doc_page = true,
        Action::CancelSearchInDocPage => state.is_searching_in_doc_page = false,
        Action::OpenDocsFilterModal => state.is_docs_filter_modal_opened = true,
        Action::CloseDocsFilterModal => state.is_docs_filter_modal_opened = false,
        Action::OpenSignInModal => state.is_sign_in_modal_opened = true,
        Action::CloseSignInModal => state.is_sign_in_modal_opened = false,

        Action::SetLoadingCachedData(loading) => {
            state.is_loading_cached_data = *loading;
        }
    }

    state
}
