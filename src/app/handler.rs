//! Event handling and intent routing.
//!
//! This module turns user intents and inbound host signals into store
//! dispatches and [`Effect`]s. It is the control-flow coordinator between
//! presentation and the session runtime.
//!
//! # Architecture
//!
//! 1. Presentation or the host sends an [`Event`]
//! 2. [`handle_event`] pattern-matches it against the current [`UiMode`]
//! 3. State changes go through the [`Store`] dispatch surface
//! 4. Side effects are collected and returned for the session to execute
//!
//! # Event Types
//!
//! - **Input**: `InputChanged`, `InputFocusChanged`
//! - **Navigation**: `NavigateUp`, `NavigateDown`, `SelectResult`, `ScrollResults`
//! - **Overlays**: `Confirm`, `Escape`, `ToggleDocsFilter`, `SearchInDocPage`, `ToggleHistoryPreview`
//! - **Outbound**: `OpenInBrowser`, `OpenInEditor`
//! - **Account**: `ConnectAccount`, `CloseSignIn`, `Signal`
//!
//! # Example
//!
//! ```rust
//! use devsearch::app::{handle_event, Event, Store};
//!
//! let mut store = Store::default();
//! let (changed, effects) = handle_event(&mut store, &Event::InputChanged("rust".into()));
//! assert!(changed);
//! assert_eq!(effects.len(), 1);
//! ```

use super::focus::Direction;
use super::modes::UiMode;
use super::store::Store;
use crate::domain::{selection_of, DocSource, Filter, ResultItem};
use crate::storage::PreferencesPatch;

/// Signals pushed by the host process rather than typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// The stored Code access token was removed.
    TokenRevoked,
    /// A new Code access token is available.
    TokenGranted,
    /// The account connection reported an error.
    ConnectionError(String),
    /// The host asks to show the sign-in modal.
    OpenSignIn,
}

/// User intents and host signals.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The search input text changed.
    InputChanged(String),
    /// Switches the active filter (ignored while a result modal is open).
    SelectFilter(Filter),
    NavigateUp,
    NavigateDown,
    /// Pointer selection of a row in the active bucket.
    SelectResult(usize),
    /// Enter: select a history entry or open the focused result.
    Confirm,
    /// Closes the topmost overlay or hides the window.
    Escape,
    OpenInBrowser,
    OpenInEditor,
    SearchInDocPage,
    ToggleDocsFilter,
    ToggleHistoryPreview,
    SelectHistoryEntry(usize),
    SetDocSourceIncluded { slug: String, included: bool },
    /// The Docs results pane was resized to the given pixel width.
    ResizeResultsPane(u32),
    /// The active bucket was scrolled to the given offset.
    ScrollResults(f64),
    InputFocusChanged(bool),
    ConnectAccount,
    CloseSignIn,
    Signal(Signal),
}

/// Side effects for the session runtime.
///
/// Effects marked *outbound* are forwarded to the host unchanged; the rest
/// are executed by the session itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Outbound: open a URL in the default browser.
    OpenExternalLink(String),
    /// Outbound: open file content in an external editor at `line`.
    OpenInEditor {
        file_path: String,
        content: String,
        line: u32,
    },
    /// Outbound: hide the main window.
    HideMainWindow,
    /// Outbound: start the interactive account sign-in flow.
    ConnectAccount,
    /// Feed the trimmed query to the query debouncer.
    QueryEdited(String),
    /// Feed the enabled doc sources to the doc-selection debouncer.
    DocSelectionChanged(Vec<DocSource>),
    SavePreferences(PreferencesPatch),
    /// Load the account again and re-run the Code step once connected.
    ReloadAccount,
    /// Forget credentials and return the account to the zero state.
    DisconnectAccount,
}

impl Effect {
    /// Whether the effect is forwarded to the host.
    #[must_use]
    pub const fn is_outbound(&self) -> bool {
        matches!(
            self,
            Self::OpenExternalLink(_)
                | Self::OpenInEditor { .. }
                | Self::HideMainWindow
                | Self::ConnectAccount
        )
    }
}

/// Processes an event against the store and returns effects to execute.
///
/// The boolean is `true` when the state may have changed and presentation
/// should re-render.
///
/// # Tracing
///
/// Each call creates a debug-level span with the event.
#[allow(clippy::too_many_lines)]
pub fn handle_event(store: &mut Store, event: &Event) -> (bool, Vec<Effect>) {
    let _span = tracing::debug_span!("handle_event", event = ?event).entered();

    match event {
        Event::InputChanged(text) => {
            if text.is_empty() {
                tracing::debug!("input cleared, clearing results");
                store.clear_results();
            } else {
                store.set_query(text.clone());
            }
            (true, vec![Effect::QueryEdited(text.trim().to_string())])
        }

        Event::SelectFilter(filter) => {
            let state = store.state();
            if state.modal_item.is_some() {
                tracing::debug!(%filter, "ignoring filter switch while modal is open");
                return (false, vec![]);
            }
            if state.search.filter == *filter {
                return (false, vec![]);
            }
            let persist = !state.is_loading_cached_data;
            store.set_filter(*filter);
            let effects = if persist {
                vec![Effect::SavePreferences(PreferencesPatch::filter(*filter))]
            } else {
                vec![]
            };
            (true, effects)
        }

        Event::NavigateUp => (navigate(store, Direction::Up), vec![]),
        Event::NavigateDown => (navigate(store, Direction::Down), vec![]),

        Event::SelectResult(index) => (store.select_result(*index), vec![]),

        Event::Confirm => confirm(store),

        Event::Escape => escape(store),

        Event::OpenInBrowser => {
            let Some(item) = target_item(store) else {
                tracing::debug!("no result to open");
                return (false, vec![]);
            };
            let url = item.external_url();
            tracing::debug!(url = %url, "opening result in browser");
            (false, vec![Effect::OpenExternalLink(url)])
        }

        Event::OpenInEditor => match target_item(store) {
            Some(ResultItem::Code(code)) => {
                let effect = Effect::OpenInEditor {
                    file_path: code.file_path.clone(),
                    content: code.file_content.clone(),
                    line: code.target_line(),
                };
                (false, vec![effect])
            }
            _ => (false, vec![]),
        },

        Event::SearchInDocPage => {
            let state = store.state();
            if state.search.filter != Filter::Docs || state.is_docs_filter_modal_opened {
                return (false, vec![]);
            }
            store.search_in_doc_page();
            (true, vec![])
        }

        Event::ToggleDocsFilter => {
            let state = store.state();
            if state.search.filter != Filter::Docs {
                return (false, vec![]);
            }
            if state.is_docs_filter_modal_opened {
                store.close_docs_filter_modal();
            } else {
                store.open_docs_filter_modal();
            }
            (true, vec![])
        }

        Event::ToggleHistoryPreview => {
            let visible = store.state().history.is_preview_visible;
            store.toggle_history_preview(!visible);
            (true, vec![])
        }

        Event::SelectHistoryEntry(index) => select_history(store, *index),

        Event::SetDocSourceIncluded { slug, included } => {
            store.set_doc_source_included(slug.clone(), *included);
            let enabled = store.state().enabled_doc_sources();
            (true, vec![Effect::DocSelectionChanged(enabled)])
        }

        Event::ResizeResultsPane(width) => {
            store.set_results_pane_width(*width);
            (
                true,
                vec![Effect::SavePreferences(PreferencesPatch::results_pane_width(*width))],
            )
        }

        Event::ScrollResults(position) => {
            let filter = store.state().search.filter;
            store.cache_scroll_top_position(filter, *position);
            (false, vec![])
        }

        Event::InputFocusChanged(focused) => {
            store.toggle_input_focus(*focused);
            (true, vec![])
        }

        Event::ConnectAccount => (false, vec![Effect::ConnectAccount]),

        Event::CloseSignIn => {
            store.close_sign_in_modal();
            (true, vec![])
        }

        Event::Signal(signal) => handle_signal(store, signal),
    }
}

fn navigate(store: &mut Store, direction: Direction) -> bool {
    if store.state().ui_mode() == UiMode::HistoryPreview {
        store.browse_history(direction)
    } else {
        store.move_focus(direction)
    }
}

fn select_history(store: &mut Store, index: usize) -> (bool, Vec<Effect>) {
    store.select_history_entry(index).map_or_else(
        || (false, vec![]),
        |query| (true, vec![Effect::QueryEdited(query.trim().to_string())]),
    )
}

fn confirm(store: &mut Store) -> (bool, Vec<Effect>) {
    let state = store.state();
    match state.ui_mode() {
        UiMode::HistoryPreview => {
            let index = state.history.browse_index;
            select_history(store, index)
        }
        UiMode::Results | UiMode::SignIn => {
            if state.search.filter == Filter::Docs {
                return (false, vec![]);
            }
            let Some(item) = state.focused_item().cloned() else {
                return (false, vec![]);
            };
            tracing::debug!(key = %item.key(), "opening result modal");
            store.open_modal(item);
            (true, vec![])
        }
        UiMode::ResultModal | UiMode::DocsFilter => (false, vec![]),
    }
}

fn escape(store: &mut Store) -> (bool, Vec<Effect>) {
    let state = store.state();
    if state.modal_item.is_some() {
        store.close_modal();
    } else if state.is_searching_in_doc_page {
        store.cancel_search_in_doc_page();
    } else if state.is_docs_filter_modal_opened {
        store.close_docs_filter_modal();
    } else if state.is_sign_in_modal_opened {
        store.close_sign_in_modal();
    } else {
        return (false, vec![Effect::HideMainWindow]);
    }
    (true, vec![])
}

/// Result the outbound intents act on: the visible modal item, else the
/// focused row.
fn target_item(store: &Store) -> Option<ResultItem> {
    let state = store.state();
    state
        .visible_modal_item()
        .or_else(|| state.focused_item())
        .cloned()
}

fn handle_signal(store: &mut Store, signal: &Signal) -> (bool, Vec<Effect>) {
    match signal {
        Signal::TokenRevoked => {
            tracing::debug!("access token revoked");
            (true, vec![Effect::DisconnectAccount])
        }
        Signal::TokenGranted => {
            tracing::debug!("access token granted");
            (true, vec![Effect::ReloadAccount])
        }
        Signal::ConnectionError(message) => {
            tracing::warn!(error = %message, "account connection error");
            store.set_account_error(message.clone());
            (true, vec![])
        }
        Signal::OpenSignIn => {
            store.open_sign_in_modal();
            (true, vec![])
        }
    }
}

/// Persisted form of the current doc-source choices.
pub(crate) fn doc_selection_patch(store: &Store) -> PreferencesPatch {
    PreferencesPatch::doc_sources(selection_of(&store.state().doc_sources))
}
