//! Intent-level entry points on the [`Store`].
//!
//! Presentation and hotkey layers call these instead of building [`Action`]s
//! by hand. Each method constructs one action (or asks the focus tracker or
//! history ring for one) and submits it. Methods that may be no-ops return
//! `bool` so callers know whether anything changed.

use super::actions::Action;
use super::focus::{self, Direction};
use super::history;
use super::state::FocusIntent;
use super::store::Store;
use crate::domain::{DocSource, Filter, ResultItem};

impl Store {
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.dispatch(Action::SetQuery(query.into()));
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.dispatch(Action::SetFilter(filter));
    }

    pub fn clear_results(&mut self) {
        self.dispatch(Action::ClearResults);
    }

    pub fn start_search(&mut self, filter: Filter) {
        self.dispatch(Action::StartSearch(filter));
    }

    pub fn search_succeeded(&mut self, filter: Filter, items: Vec<ResultItem>) {
        self.dispatch(Action::SearchSucceeded { filter, items });
    }

    pub fn search_failed(&mut self, filter: Filter, message: impl Into<String>) {
        self.dispatch(Action::SearchFailed {
            filter,
            message: message.into(),
        });
    }

    /// Moves the active bucket's cursor one row. Returns `false` on a no-op.
    pub fn move_focus(&mut self, direction: Direction) -> bool {
        focus::navigate(self.state(), direction).map_or(false, |action| {
            self.dispatch(action);
            true
        })
    }

    /// Focuses row `index` of the active bucket if it exists.
    pub fn select_result(&mut self, index: usize) -> bool {
        let filter = self.state().search.filter;
        focus::select_direct(self.state(), filter, index).map_or(false, |action| {
            self.dispatch(action);
            true
        })
    }

    /// Returns the active bucket's pending focus intent and marks it consumed.
    ///
    /// Presentation calls this once per render; a second call returns
    /// [`FocusIntent::None`] until the cursor moves again.
    pub fn consume_focus_intent(&mut self) -> FocusIntent {
        let filter = self.state().search.filter;
        let intent = self.state().results[filter].focused.intent;
        if intent != FocusIntent::None {
            self.dispatch(Action::FocusIntentConsumed(filter));
        }
        intent
    }

    pub fn cache_scroll_top_position(&mut self, filter: Filter, position: f64) {
        self.dispatch(Action::CacheScrollTopPosition { filter, position });
    }

    pub fn open_modal(&mut self, item: ResultItem) {
        self.dispatch(Action::OpenModal(item));
    }

    pub fn close_modal(&mut self) {
        self.dispatch(Action::CloseModal);
    }

    pub fn start_connect(&mut self) {
        self.dispatch(Action::StartConnect);
    }

    pub fn connect_succeeded(&mut self) {
        self.dispatch(Action::ConnectSucceeded);
    }

    pub fn connect_failed(&mut self, message: impl Into<String>) {
        self.dispatch(Action::ConnectFailed(message.into()));
    }

    pub fn disconnect_account(&mut self) {
        self.dispatch(Action::Disconnect);
    }

    pub fn set_account_error(&mut self, message: impl Into<String>) {
        self.dispatch(Action::SetAccountError(message.into()));
    }

    pub fn doc_sources_fetched(&mut self, sources: Vec<DocSource>) {
        self.dispatch(Action::DocSourcesFetched(sources));
    }

    pub fn doc_sources_fetch_failed(&mut self, message: impl Into<String>) {
        self.dispatch(Action::DocSourcesFetchFailed(message.into()));
    }

    pub fn set_doc_source_included(&mut self, slug: impl Into<String>, included: bool) {
        self.dispatch(Action::SetDocSourceIncluded {
            slug: slug.into(),
            included,
        });
    }

    pub fn set_results_pane_width(&mut self, width: u32) {
        self.dispatch(Action::SetResultsPaneWidth(width));
    }

    pub fn set_history(&mut self, entries: Vec<String>) {
        self.dispatch(Action::SetHistory(entries));
    }

    pub fn toggle_history_preview(&mut self, visible: bool) {
        self.dispatch(Action::ToggleHistoryPreview(visible));
    }

    /// Moves the history preview cursor. Returns `false` on a no-op.
    pub fn browse_history(&mut self, direction: Direction) -> bool {
        history::browse(self.state(), direction).map_or(false, |action| {
            self.dispatch(action);
            true
        })
    }

    /// Makes history entry `index` the live query and closes the preview.
    ///
    /// Returns the selected query so the caller can feed the query debouncer.
    pub fn select_history_entry(&mut self, index: usize) -> Option<String> {
        let (query, actions) = history::select(self.state(), index)?;
        self.dispatch_all(actions);
        Some(query)
    }

    pub fn toggle_input_focus(&mut self, focused: bool) {
        self.dispatch(Action::ToggleInputFocus(focused));
    }

    pub fn search_in_doc_page(&mut self) {
        self.dispatch(Action::SearchInDocPage);
    }

    pub fn cancel_search_in_doc_page(&mut self) {
        self.dispatch(Action::CancelSearchInDocPage);
    }

    pub fn open_docs_filter_modal(&mut self) {
        self.dispatch(Action::OpenDocsFilterModal);
    }

    pub fn close_docs_filter_modal(&mut self) {
        self.dispatch(Action::CloseDocsFilterModal);
    }

    pub fn open_sign_in_modal(&mut self) {
        self.dispatch(Action::OpenSignInModal);
    }

    pub fn close_sign_in_modal(&mut self) {
        self.dispatch(Action::CloseSignInModal);
    }

    pub fn set_loading_cached_data(&mut self, loading: bool) {
        self.dispatch(Action::SetLoadingCachedData(loading));
    }
}
