//! State transitions understood by the reducer.
//!
//! An [`Action`] describes *what happened*; the [reducer](super::reducer::reduce)
//! decides what the new [`State`](super::State) looks like. Actions never carry
//! behaviour and are cheap to clone, so the orchestrator and the account task
//! can send them over a channel to the session loop that owns the store.
//!
//! # Categories
//!
//! - **Query/filter**: `SetQuery`, `SetFilter`, `ClearResults`
//! - **Search lifecycle**: `StartSearch`, `SearchSucceeded`, `SearchFailed`
//! - **Focus**: `FocusItem`, `FocusIntentConsumed`, `CacheScrollTopPosition`
//! - **Modal**: `OpenModal`, `CloseModal`
//! - **Account**: `StartConnect`, `ConnectSucceeded`, `ConnectFailed`, `Disconnect`, `SetAccountError`
//! - **Doc sources**: `DocSourcesFetched`, `DocSourcesFetchFailed`, `SetDocSourceIncluded`
//! - **Layout, history and overlays**: everything else
//!
//! # Example
//!
//! ```rust
//! use devsearch::app::{reduce, Action, State};
//! use devsearch::Filter;
//!
//! let state = reduce(State::default(), &Action::StartSearch(Filter::Qa));
//! let state = reduce(state, &Action::SearchSucceeded { filter: Filter::Qa, items: vec![] });
//! assert!(!state.results[Filter::Qa].is_loading);
//! ```

use super::state::FocusIntent;
use crate::domain::{DocSource, Filter, ResultItem};

/// Everything that can change the application state.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replaces the live query text. Does not start a search by itself.
    SetQuery(String),

    /// Switches the active filter.
    SetFilter(Filter),

    /// Empties every bucket, the live query and the last searched query.
    ClearResults,

    /// Marks a bucket loading and clears its items.
    StartSearch(Filter),

    /// Replaces a bucket's items and advances `last_searched_query`.
    SearchSucceeded {
        filter: Filter,
        items: Vec<ResultItem>,
    },

    /// Empties a bucket and records the failure for that filter.
    SearchFailed {
        filter: Filter,
        message: String,
    },

    /// Moves a bucket's cursor. The index is validated by the caller.
    FocusItem {
        filter: Filter,
        index: usize,
        intent: FocusIntent,
    },

    /// Presentation has acted on a bucket's focus intent.
    FocusIntentConsumed(Filter),

    /// Remembers where a bucket was scrolled to before leaving it.
    CacheScrollTopPosition {
        filter: Filter,
        position: f64,
    },

    OpenModal(ResultItem),
    CloseModal,

    StartConnect,
    ConnectSucceeded,
    ConnectFailed(String),
    /// Returns the account to the benign zero state from anywhere.
    Disconnect,
    /// Sets an account error without touching the connection flags.
    SetAccountError(String),

    /// Catalogue already merged with the persisted selection.
    DocSourcesFetched(Vec<DocSource>),
    DocSourcesFetchFailed(String),
    SetDocSourceIncluded {
        slug: String,
        included: bool,
    },

    SetResultsPaneWidth(u32),

    /// Replaces history entries, most recent last.
    SetHistory(Vec<String>),
    SetHistoryBrowseIndex(usize),
    ToggleHistoryPreview(bool),
    ToggleInputFocus(bool),

    SearchInDocPage,
    CancelSearchInDocPage,
    OpenDocsFilterModal,
    CloseDocsFilterModal,
    OpenSignInModal,
    CloseSignInModal,
    SetLoadingCachedData(bool),
}
