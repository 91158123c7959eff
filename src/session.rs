//! Session runtime.
//!
//! A [`Session`] owns the [`Store`], the query and doc-selection debouncers,
//! the [`Orchestrator`] and the [`PreferencesStore`]. It is the single writer
//! of the state: events from presentation, stabilized values from the
//! debouncers and actions sent back by background tasks are all applied
//! from one loop, in arrival order.
//!
//! # Lifecycle
//!
//! 1. [`Session::new`] spawns the debouncers on the current tokio runtime
//! 2. [`Session::bootstrap`] restores preferences, fetches the doc catalogue
//!    and starts loading the account
//! 3. [`Session::run`] drives the loop until the event channel closes
//!
//! Tests drive the same machinery step by step with [`Session::handle`] and
//! [`Session::settle`].

use crate::app::handler::doc_selection_patch;
use crate::app::{handle_event, history, Action, Effect, Event, State, Store};
use crate::domain::{merge_selection, AccountError, DocSource, Filter};
use crate::search::{AccountService, Debouncer, DocCatalogue, Orchestrator, SearchBackends, SearchRequest};
use crate::storage::{Preferences, PreferencesPatch, PreferencesStore};
use crate::Config;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Remote collaborators injected into a session.
#[derive(Clone)]
pub struct Services {
    pub backends: Arc<dyn SearchBackends>,
    pub account: Arc<dyn AccountService>,
    pub catalogue: Arc<dyn DocCatalogue>,
}

/// Single-threaded runtime around the store.
pub struct Session {
    store: Store,
    preferences: Box<dyn PreferencesStore>,
    account: Arc<dyn AccountService>,
    catalogue: Arc<dyn DocCatalogue>,
    orchestrator: Orchestrator,

    query_debouncer: Debouncer<String>,
    stable_queries: mpsc::UnboundedReceiver<String>,
    doc_debouncer: Debouncer<Vec<DocSource>>,
    stable_doc_selections: mpsc::UnboundedReceiver<Vec<DocSource>>,

    actions_tx: mpsc::UnboundedSender<Action>,
    actions: mpsc::UnboundedReceiver<Action>,

    /// Latest value emitted by the query debouncer.
    debounced_query: String,

    /// Stable query the last fan-out was started for. Empty after a clear.
    searched_query: String,

    /// Re-run the Code step when the pending account load connects.
    rerun_code_on_connect: bool,
}

impl Session {
    /// Creates a session. Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(config: &Config, services: Services, preferences: Box<dyn PreferencesStore>) -> Self {
        let (actions_tx, actions) = mpsc::unbounded_channel();
        let (query_debouncer, stable_queries) = Debouncer::spawn(config.debounce_window());
        let (doc_debouncer, stable_doc_selections) =
            Debouncer::spawn(config.doc_sources_debounce_window());
        let orchestrator = Orchestrator::new(
            services.backends,
            actions_tx.clone(),
            config.discard_stale_responses,
        );

        tracing::debug!(
            debounce_ms = config.debounce_ms,
            doc_sources_debounce_ms = config.doc_sources_debounce_ms,
            discard_stale = config.discard_stale_responses,
            "session created"
        );

        Self {
            store: Store::new(State::new(config.default_results_pane_width)),
            preferences,
            account: services.account,
            catalogue: services.catalogue,
            orchestrator,
            query_debouncer,
            stable_queries,
            doc_debouncer,
            stable_doc_selections,
            actions_tx,
            actions,
            debounced_query: String::new(),
            searched_query: String::new(),
            rerun_code_on_connect: false,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &State {
        self.store.state()
    }

    /// Mutable access to the dispatch surface, for presentation callbacks
    /// that do not go through [`Event`]s (such as `consume_focus_intent`).
    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    /// Restores cached data and starts loading the account.
    pub async fn bootstrap(&mut self) {
        let prefs = self.restore_cached();

        match self.catalogue.fetch_doc_sources().await {
            Ok(catalogue) => {
                let merged = merge_selection(catalogue, &prefs.doc_sources);
                tracing::debug!(
                    total = merged.len(),
                    enabled = merged.iter().filter(|s| s.is_included_in_search).count(),
                    "doc catalogue loaded"
                );
                self.store.doc_sources_fetched(merged);
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch doc catalogue");
                self.store.doc_sources_fetch_failed(e.message());
            }
        }

        self.store.set_loading_cached_data(false);
        self.spawn_account_load(true);
        tracing::info!("session bootstrapped");
    }

    /// Applies persisted preferences and history to the store.
    fn restore_cached(&mut self) -> Preferences {
        let _span = tracing::info_span!("restore_cached").entered();

        let prefs = self.preferences.load_preferences().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to load preferences, using defaults");
            Preferences::default()
        });
        let history = self.preferences.load_history().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to load history");
            Vec::new()
        });

        if let Some(width) = prefs.results_pane_width {
            self.store.set_results_pane_width(width);
        }
        self.store.set_filter(prefs.filter);
        self.store.set_history(history);

        match prefs.saved_query() {
            None => {
                tracing::debug!("no saved query");
                for filter in Filter::ALL {
                    self.store.search_succeeded(filter, Vec::new());
                }
            }
            Some(query) => {
                tracing::debug!(query = %query, "restoring saved query");
                self.store.set_query(query);
                self.query_debouncer.push(query.to_string());
            }
        }

        prefs
    }

    /// Handles one event and returns the effects meant for the host.
    pub async fn handle(&mut self, event: &Event) -> Vec<Effect> {
        let (_changed, effects) = handle_event(&mut self.store, event);

        let mut outbound = Vec::new();
        for effect in effects {
            if effect.is_outbound() {
                outbound.push(effect);
            } else {
                self.execute(effect).await;
            }
        }
        outbound
    }

    /// Processes background inputs until none arrives for `quiet`.
    ///
    /// `quiet` should exceed the debounce windows and backend latency for
    /// the session to reach a steady state.
    pub async fn settle(&mut self, quiet: Duration) {
        loop {
            tokio::select! {
                Some(action) = self.actions.recv() => self.apply(action),
                Some(query) = self.stable_queries.recv() => self.on_stable_query(query),
                Some(_) = self.stable_doc_selections.recv() => self.on_stable_doc_selection(),
                () = tokio::time::sleep(quiet) => break,
            }
        }
    }

    /// Drives the session until `events` closes.
    ///
    /// Outbound effects are forwarded to `outbound`; if the host stops
    /// listening they are dropped with a warning.
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<Event>,
        outbound: mpsc::UnboundedSender<Effect>,
    ) {
        tracing::info!("session loop started");
        loop {
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else { break };
                    for effect in self.handle(&event).await {
                        if outbound.send(effect).is_err() {
                            tracing::warn!("outbound receiver dropped");
                        }
                    }
                }
                Some(action) = self.actions.recv() => self.apply(action),
                Some(query) = self.stable_queries.recv() => self.on_stable_query(query),
                Some(_) = self.stable_doc_selections.recv() => self.on_stable_doc_selection(),
            }
        }

        self.query_debouncer.cancel();
        self.doc_debouncer.cancel();
        tracing::info!("session loop stopped");
    }

    async fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::QueryEdited(query) => {
                if query.is_empty() {
                    self.orchestrator.supersede_all();
                    self.searched_query.clear();
                }
                self.query_debouncer.push(query);
            }
            Effect::DocSelectionChanged(enabled) => {
                self.doc_debouncer.push(enabled);
            }
            Effect::SavePreferences(patch) => self.persist(&patch),
            Effect::ReloadAccount => self.spawn_account_load(true),
            Effect::DisconnectAccount => {
                self.account.disconnect().await;
                self.rerun_code_on_connect = false;
                self.store.disconnect_account();
            }
            Effect::OpenExternalLink(_)
            | Effect::OpenInEditor { .. }
            | Effect::HideMainWindow
            | Effect::ConnectAccount => {
                tracing::trace!(effect = ?effect, "outbound effect reached session");
            }
        }
    }

    /// Applies an action sent by a background task.
    fn apply(&mut self, action: Action) {
        let connected = matches!(action, Action::ConnectSucceeded);
        let settled = connected || matches!(action, Action::ConnectFailed(_) | Action::Disconnect);
        self.store.dispatch(action);

        if !settled {
            return;
        }
        let rerun = std::mem::take(&mut self.rerun_code_on_connect);
        if connected && rerun && !self.debounced_query.is_empty() {
            tracing::debug!(query = %self.debounced_query, "account connected, re-running code search");
            let request = SearchRequest::from_state(self.store.state(), self.debounced_query.clone());
            self.orchestrator.spawn_single(Filter::Code, request);
        }
    }

    fn on_stable_query(&mut self, query: String) {
        let _span = tracing::debug_span!("stable_query", query = %query).entered();
        self.debounced_query.clone_from(&query);

        if query.is_empty() || query == self.searched_query {
            tracing::debug!("query unchanged since last search, not searching");
            return;
        }

        let state = self.store.state();
        if let Some(entries) = history::record(&state.history.entries, &query) {
            let kept = self.preferences.save_history(&entries).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "failed to save history");
                entries
            });
            self.store.set_history(kept);
        }
        self.persist(&PreferencesPatch::query(query.clone()));
        self.searched_query.clone_from(&query);

        let request = SearchRequest::from_state(self.store.state(), query);
        self.orchestrator.spawn_fan_out(request);
    }

    fn on_stable_doc_selection(&mut self) {
        let _span = tracing::debug_span!("stable_doc_selection").entered();
        self.persist(&doc_selection_patch(&self.store));

        if self.debounced_query.is_empty() {
            return;
        }
        let request = SearchRequest::from_state(self.store.state(), self.debounced_query.clone());
        self.orchestrator.spawn_single(Filter::Docs, request);
    }

    fn spawn_account_load(&mut self, rerun_code: bool) {
        self.store.start_connect();
        self.rerun_code_on_connect = rerun_code;

        let account = Arc::clone(&self.account);
        let actions = self.actions_tx.clone();
        tokio::spawn(async move {
            let action = match account.initialize().await {
                Ok(()) => {
                    tracing::info!("code account connected");
                    Action::ConnectSucceeded
                }
                Err(AccountError::NoAccessToken) => {
                    tracing::debug!("no stored access token");
                    Action::Disconnect
                }
                Err(AccountError::Failed(reason)) => {
                    tracing::warn!(error = %reason, "failed to connect code account");
                    Action::ConnectFailed(reason)
                }
            };
            if actions.send(action).is_err() {
                tracing::trace!("session gone before account load finished");
            }
        });
    }

    fn persist(&mut self, patch: &PreferencesPatch) {
        if let Err(e) = self.preferences.save_preferences(patch) {
            tracing::warn!(error = %e, "failed to save preferences");
        }
    }
}
