//! Sequential fan-out of one query across the three backends.
//!
//! The orchestrator never holds a reference to the store. It sends
//! [`Action`]s over the session's action channel, and the session applies
//! them in the order they arrive.
//!
//! # Ordering
//!
//! Backends are visited one after the other in [`Filter::search_order`]: the
//! active filter first, then the fixed fallback order. A failure is reported
//! for its own filter only and never stops the remaining steps.
//!
//! # Stale responses
//!
//! Each filter has a generation counter. Starting a fan-out bumps all three,
//! a single-step search bumps its own. A step whose token is no longer the
//! live generation is skipped before it starts and its result is discarded
//! if it completes late. [`Orchestrator::supersede_all`] bumps every counter
//! without starting anything, for when the query is cleared. With
//! `discard_stale` off the counters are ignored
//! and the last response to arrive wins.

use super::backend::SearchBackends;
use crate::app::{Action, State};
use crate::domain::{DocSource, Filter, ResultItem};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Snapshot of everything a fan-out needs, taken when the query stabilized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Trimmed, non-empty query.
    pub query: String,
    pub filter: Filter,
    pub code_connected: bool,
    pub enabled_sources: Vec<DocSource>,
}

impl SearchRequest {
    /// Builds a request for `query` from the current state.
    #[must_use]
    pub fn from_state(state: &State, query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            filter: state.search.filter,
            code_connected: state.account.is_connected,
            enabled_sources: state.enabled_doc_sources(),
        }
    }
}

/// Generation a search step was started under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchToken {
    pub filter: Filter,
    pub generation: u64,
}

#[derive(Debug, Default)]
struct Generations([AtomicU64; 3]);

impl Generations {
    fn bump(&self, filter: Filter) -> SearchToken {
        let generation = self.0[filter.slot()].fetch_add(1, Ordering::SeqCst) + 1;
        SearchToken { filter, generation }
    }

    fn is_live(&self, token: SearchToken) -> bool {
        self.0[token.filter.slot()].load(Ordering::SeqCst) == token.generation
    }
}

/// Issues backend calls and reports their outcome as actions.
///
/// Cheap to clone; clones share the backends, the action channel and the
/// generation counters.
#[derive(Clone)]
pub struct Orchestrator {
    backends: Arc<dyn SearchBackends>,
    actions: mpsc::UnboundedSender<Action>,
    generations: Arc<Generations>,
    discard_stale: bool,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("discard_stale", &self.discard_stale)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    #[must_use]
    pub fn new(
        backends: Arc<dyn SearchBackends>,
        actions: mpsc::UnboundedSender<Action>,
        discard_stale: bool,
    ) -> Self {
        Self {
            backends,
            actions,
            generations: Arc::new(Generations::default()),
            discard_stale,
        }
    }

    /// Supersedes every running step and spawns a full fan-out.
    pub fn spawn_fan_out(&self, request: SearchRequest) -> JoinHandle<()> {
        let order = request.filter.search_order();
        let tokens = order.map(|filter| self.generations.bump(filter));
        let span = tracing::debug_span!("fan_out", query = %request.query, filter = %request.filter);
        let this = self.clone();
        tokio::spawn(async move { this.fan_out(tokens, &request).await }.instrument(span))
    }

    /// Supersedes the running step for `filter` and spawns only that step.
    pub fn spawn_single(&self, filter: Filter, request: SearchRequest) -> JoinHandle<()> {
        let token = self.generations.bump(filter);
        let span = tracing::debug_span!("search_single", query = %request.query, filter = %filter);
        let this = self.clone();
        tokio::spawn(
            async move {
                this.step(token, &request).await;
            }
            .instrument(span),
        )
    }

    /// Marks every running step as stale without starting new ones.
    ///
    /// Steps already waiting on a backend drop their response, and the
    /// remaining steps of their fan-out never start.
    pub fn supersede_all(&self) {
        for filter in Filter::ALL {
            self.generations.bump(filter);
        }
        tracing::debug!("superseded all running searches");
    }

    async fn fan_out(&self, tokens: [SearchToken; 3], request: &SearchRequest) {
        for token in tokens {
            if !self.step(token, request).await {
                tracing::trace!("action channel closed, abandoning fan-out");
                return;
            }
        }
        tracing::debug!("fan-out finished");
    }

    /// Runs one backend step. Returns `false` once the session is gone.
    async fn step(&self, token: SearchToken, request: &SearchRequest) -> bool {
        let filter = token.filter;
        if self.is_stale(token) {
            tracing::debug!(%filter, "skipping superseded step");
            return true;
        }

        if let Some(reason) = skip_reason(filter, request) {
            tracing::debug!(%filter, reason, "skipping backend call");
            return self.send(Action::SearchSucceeded {
                filter,
                items: Vec::new(),
            });
        }

        if !self.send(Action::StartSearch(filter)) {
            return false;
        }

        let outcome = self
            .call_backend(filter, request)
            .instrument(tracing::debug_span!("backend_step", %filter))
            .await;

        if self.is_stale(token) {
            tracing::debug!(%filter, generation = token.generation, "discarding stale response");
            return true;
        }

        let action = match outcome {
            Ok(items) => {
                tracing::debug!(%filter, count = items.len(), "search succeeded");
                Action::SearchSucceeded { filter, items }
            }
            Err(message) => {
                tracing::warn!(%filter, error = %message, "search failed");
                Action::SearchFailed { filter, message }
            }
        };
        self.send(action)
    }

    async fn call_backend(&self, filter: Filter, request: &SearchRequest) -> Result<Vec<ResultItem>, String> {
        let query = request.query.as_str();
        let result = match filter {
            Filter::Qa => self.backends.search_qa(query).await,
            Filter::Code => self.backends.search_code(query).await,
            Filter::Docs => self.backends.search_docs(query, &request.enabled_sources).await,
        };
        result.map_err(|e| e.message().to_string())
    }

    fn is_stale(&self, token: SearchToken) -> bool {
        self.discard_stale && !self.generations.is_live(token)
    }

    fn send(&self, action: Action) -> bool {
        self.actions.send(action).is_ok()
    }
}

/// Steps that resolve to an empty bucket without a backend call.
fn skip_reason(filter: Filter, request: &SearchRequest) -> Option<&'static str> {
    match filter {
        Filter::Code if !request.code_connected => Some("code account not connected"),
        Filter::Docs if request.enabled_sources.is_empty() => Some("no doc sources enabled"),
        _ => None,
    }
}
