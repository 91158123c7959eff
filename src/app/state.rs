//! Application state and read-only selectors.
//!
//! This module defines [`State`], the single value that holds the query, the
//! active filter, the three result buckets, overlay flags, account status and
//! layout preferences. It is owned by the [`Store`](super::Store) and only
//! ever replaced by the [reducer](super::reducer::reduce).
//!
//! # State Components
//!
//! - **Search**: live query, last successfully searched query, active filter
//! - **Results**: one [`ResultBucket`] per [`Filter`]
//! - **Modal and overlays**: open result item, docs filter, sign-in, doc page search
//! - **Account**: Code backend connection lifecycle
//! - **Doc sources**: catalogue merged with the user's include/exclude choices
//! - **History**: previously searched queries plus the preview cursor
//!
//! Selectors such as [`State::active_bucket`] and [`State::ui_mode`] derive
//! everything the handler and presentation need without storing it twice.

use super::modes::UiMode;
use crate::domain::{enabled_sources, DocSource, Filter, ResultItem};
use std::ops::{Index, IndexMut};

/// Whether a focus change should scroll the focused row into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusIntent {
    /// Already consumed by presentation; nothing to do.
    #[default]
    None,
    /// Focus moved without forcing a scroll (mouse selection, fresh results).
    NoScroll,
    /// Focus moved by keyboard; scroll the row into view.
    WithScroll,
}

/// Cursor inside one result bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusedIndex {
    pub index: usize,
    pub intent: FocusIntent,
}

impl Default for FocusedIndex {
    fn default() -> Self {
        Self {
            index: 0,
            intent: FocusIntent::NoScroll,
        }
    }
}

/// Results plus loading, focus and scroll state for one filter.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultBucket {
    /// Items of the variant matching the bucket's filter.
    pub items: Vec<ResultItem>,

    /// `true` while a search for this filter is awaited.
    ///
    /// Buckets start out loading so presentation does not flash an empty
    /// state before cached data has been restored.
    pub is_loading: bool,

    /// Scroll offset cached when the user leaves this filter.
    pub scroll_top_position: f64,

    /// Keyboard cursor. Reset to index 0 whenever `items` is replaced.
    pub focused: FocusedIndex,

    /// Message of the last failed search of this filter only.
    pub failure: Option<String>,
}

impl ResultBucket {
    fn awaiting_first_search() -> Self {
        Self {
            items: Vec::new(),
            is_loading: true,
            scroll_top_position: 0.0,
            focused: FocusedIndex::default(),
            failure: None,
        }
    }

    pub(crate) fn cleared() -> Self {
        Self {
            is_loading: false,
            ..Self::awaiting_first_search()
        }
    }

    /// Number of items in the bucket.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The item under the cursor, if the bucket has any.
    #[must_use]
    pub fn focused_item(&self) -> Option<&ResultItem> {
        self.items.get(self.focused.index)
    }
}

/// The three buckets, addressable by [`Filter`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResultBuckets {
    buckets: [ResultBucket; 3],
}

impl ResultBuckets {
    fn awaiting_first_search() -> Self {
        Self {
            buckets: [
                ResultBucket::awaiting_first_search(),
                ResultBucket::awaiting_first_search(),
                ResultBucket::awaiting_first_search(),
            ],
        }
    }

    pub(crate) fn cleared() -> Self {
        Self {
            buckets: [ResultBucket::cleared(), ResultBucket::cleared(), ResultBucket::cleared()],
        }
    }

    /// Iterates the buckets together with their filter, in fallback order.
    pub fn iter(&self) -> impl Iterator<Item = (Filter, &ResultBucket)> {
        Filter::ALL.into_iter().map(move |filter| (filter, &self[filter]))
    }
}

impl Index<Filter> for ResultBuckets {
    type Output = ResultBucket;

    fn index(&self, filter: Filter) -> &Self::Output {
        &self.buckets[filter.slot()]
    }
}

impl IndexMut<Filter> for ResultBuckets {
    fn index_mut(&mut self, filter: Filter) -> &mut Self::Output {
        &mut self.buckets[filter.slot()]
    }
}

/// Query text and active filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchState {
    /// Text currently in the input box, untrimmed.
    pub query: String,

    /// Query of the last successful search. Advanced only by
    /// `SearchSucceeded`, never eagerly when a search starts.
    pub last_searched_query: String,

    pub filter: Filter,
}

/// Lifecycle position of the Code account, derived from [`AccountState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Disconnected,
    Connecting,
    Connected,
    /// Disconnected with an error message to show.
    Failed,
}

/// Connection state of the Code backend account.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccountState {
    pub is_loading: bool,
    pub is_connected: bool,
    /// Empty in the benign "never connected" zero state.
    pub error: String,
}

impl AccountState {
    #[must_use]
    pub fn status(&self) -> AccountStatus {
        if self.is_loading {
            AccountStatus::Connecting
        } else if self.is_connected {
            AccountStatus::Connected
        } else if self.error.is_empty() {
            AccountStatus::Disconnected
        } else {
            AccountStatus::Failed
        }
    }
}

/// Previously searched queries and the preview cursor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryState {
    /// Most recent last.
    pub entries: Vec<String>,
    pub browse_index: usize,
    pub is_preview_visible: bool,
}

/// Layout preferences restored at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutState {
    /// Width in pixels of the Docs results pane next to the page view.
    pub results_pane_width: u32,
}

/// Central application state.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub search: SearchState,
    pub results: ResultBuckets,

    /// Result opened in the detail modal. At most one.
    pub modal_item: Option<ResultItem>,

    pub account: AccountState,

    /// Most recent error of any kind; a new error overwrites the old one.
    pub error_message: String,

    pub layout: LayoutState,
    pub doc_sources: Vec<DocSource>,
    pub history: HistoryState,

    pub is_searching_in_doc_page: bool,
    pub is_docs_filter_modal_opened: bool,
    pub is_sign_in_modal_opened: bool,
    pub is_search_input_focused: bool,

    /// Set until persisted preferences and the doc catalogue have been
    /// restored; filter changes are not persisted meanwhile.
    pub is_loading_cached_data: bool,
}

impl State {
    /// Creates the startup state with the given default pane width.
    ///
    /// ```
    /// use devsearch::app::State;
    /// use devsearch::Filter;
    ///
    /// let state = State::new(200);
    /// assert_eq!(state.search.filter, Filter::Qa);
    /// assert!(state.results[Filter::Code].is_loading);
    /// ```
    #[must_use]
    pub fn new(results_pane_width: u32) -> Self {
        Self {
            search: SearchState::default(),
            results: ResultBuckets::awaiting_first_search(),
            modal_item: None,
            account: AccountState::default(),
            error_message: String::new(),
            layout: LayoutState { results_pane_width },
            doc_sources: Vec::new(),
            history: HistoryState::default(),
            is_searching_in_doc_page: false,
            is_docs_filter_modal_opened: false,
            is_sign_in_modal_opened: false,
            is_search_input_focused: true,
            is_loading_cached_data: true,
        }
    }

    /// Bucket of the active filter.
    #[must_use]
    pub fn active_bucket(&self) -> &ResultBucket {
        &self.results[self.search.filter]
    }

    /// Item under the cursor in the active bucket.
    #[must_use]
    pub fn focused_item(&self) -> Option<&ResultItem> {
        self.active_bucket().focused_item()
    }

    /// The modal item, but only if it belongs to the active filter.
    ///
    /// A filter switch that races a modal open can leave an item of another
    /// filter in `modal_item`; it stays stored but is not shown.
    #[must_use]
    pub fn visible_modal_item(&self) -> Option<&ResultItem> {
        self.modal_item
            .as_ref()
            .filter(|item| item.filter() == self.search.filter)
    }

    #[must_use]
    pub fn is_active_filter_loading(&self) -> bool {
        self.active_bucket().is_loading
    }

    /// Doc sources currently included in Docs searches.
    #[must_use]
    pub fn enabled_doc_sources(&self) -> Vec<DocSource> {
        enabled_sources(&self.doc_sources)
    }

    /// Which surface currently owns directional keys.
    #[must_use]
    pub fn ui_mode(&self) -> UiMode {
        if self.history.is_preview_visible {
            UiMode::HistoryPreview
        } else if self.modal_item.is_some() {
            UiMode::ResultModal
        } else if self.is_docs_filter_modal_opened {
            UiMode::DocsFilter
        } else if self.is_sign_in_modal_opened {
            UiMode::SignIn
        } else {
            UiMode::Results
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new(crate::DEFAULT_RESULTS_PANE_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::QaResult;

    fn qa(id: u64) -> ResultItem {
        ResultItem::Qa(QaResult {
            question_id: id,
            title: format!("question {id}"),
            link: format!("https://example.com/q/{id}"),
            score: 0,
            is_answered: false,
            tags: vec![],
        })
    }

    #[test]
    fn startup_buckets_are_loading() {
        let state = State::default();
        assert!(state.results.iter().all(|(_, bucket)| bucket.is_loading));
        assert_eq!(state.ui_mode(), UiMode::Results);
    }

    #[test]
    fn modal_of_other_filter_is_hidden() {
        let mut state = State::default();
        state.modal_item = Some(qa(1));
        assert!(state.visible_modal_item().is_some());
        state.search.filter = Filter::Docs;
        assert!(state.visible_modal_item().is_none());
        assert_eq!(state.ui_mode(), UiMode::ResultModal);
    }

    #[test]
    fn account_status_distinguishes_error_from_zero_state() {
        let mut account = AccountState::default();
        assert_eq!(account.status(), AccountStatus::Disconnected);
        account.error = "token expired".into();
        assert_eq!(account.status(), AccountStatus::Failed);
        account.is_loading = true;
        assert_eq!(account.status(), AccountStatus::Connecting);
    }

    #[test]
    fn history_preview_takes_precedence_over_modal() {
        let mut state = State::default();
        state.modal_item = Some(qa(1));
        state.history.is_preview_visible = true;
        assert_eq!(state.ui_mode(), UiMode::HistoryPreview);
    }
}
