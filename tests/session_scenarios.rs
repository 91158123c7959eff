//! End-to-end session behavior with in-memory collaborators.
//!
//! All tests run on paused tokio time, so debounce windows and backend
//! latency elapse instantly and deterministically.

use async_trait::async_trait;
use devsearch::app::{Effect, Event, Signal};
use devsearch::domain::{AccountError, BackendError, DocSource, QaResult, ResultItem};
use devsearch::search::{AccountService, DocCatalogue, SearchBackends};
use devsearch::storage::{Preferences, PreferencesPatch, PreferencesStore};
use devsearch::{Config, Filter, Services, Session};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const QUIET: Duration = Duration::from_secs(2);

#[derive(Default)]
struct Backends {
    calls: Mutex<Vec<(Filter, String)>>,
    doc_slugs: Mutex<Vec<Vec<String>>>,
    slow_query: Option<(&'static str, Duration)>,
    fail_docs: bool,
}

impl Backends {
    fn calls(&self) -> Vec<(Filter, String)> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn clear(&self) {
        self.calls.lock().expect("calls lock").clear();
    }

    fn record(&self, filter: Filter, query: &str) {
        self.calls.lock().expect("calls lock").push((filter, query.to_string()));
    }
}

fn qa_item(query: &str) -> ResultItem {
    ResultItem::Qa(QaResult {
        question_id: query.len() as u64,
        title: format!("How do I {query}?"),
        link: format!("https://qa.example.com/q/{}", query.len()),
        score: 3,
        is_answered: true,
        tags: vec!["rust".to_string()],
    })
}

#[async_trait]
impl SearchBackends for Backends {
    async fn search_qa(&self, query: &str) -> Result<Vec<ResultItem>, BackendError> {
        self.record(Filter::Qa, query);
        if let Some((slow, delay)) = self.slow_query {
            if slow == query {
                tokio::time::sleep(delay).await;
            }
        }
        Ok(vec![qa_item(query)])
    }

    async fn search_code(&self, query: &str) -> Result<Vec<ResultItem>, BackendError> {
        self.record(Filter::Code, query);
        Ok(vec![])
    }

    async fn search_docs(
        &self,
        query: &str,
        enabled_sources: &[DocSource],
    ) -> Result<Vec<ResultItem>, BackendError> {
        self.record(Filter::Docs, query);
        self.doc_slugs
            .lock()
            .expect("slugs lock")
            .push(enabled_sources.iter().map(|s| s.slug.clone()).collect());
        if self.fail_docs {
            return Err(BackendError::new("docs index unavailable"));
        }
        Ok(vec![])
    }
}

#[derive(Default)]
struct Account {
    has_token: AtomicBool,
    disconnects: AtomicUsize,
}

impl Account {
    fn with_token() -> Self {
        Self {
            has_token: AtomicBool::new(true),
            ..Self::default()
        }
    }
}

#[async_trait]
impl AccountService for Account {
    async fn initialize(&self) -> Result<(), AccountError> {
        if self.has_token.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AccountError::NoAccessToken)
        }
    }

    async fn disconnect(&self) {
        self.has_token.store(false, Ordering::SeqCst);
        self.disconnects.fetch_add(1, Ordering::SeqCst);
    }
}

struct Catalogue;

#[async_trait]
impl DocCatalogue for Catalogue {
    async fn fetch_doc_sources(&self) -> Result<Vec<DocSource>, BackendError> {
        Ok(vec![
            DocSource::new("rust", "Rust std", true),
            DocSource::new("python", "Python 3", false),
        ])
    }
}

#[derive(Default)]
struct Stored {
    preferences: Preferences,
    history: Vec<String>,
}

#[derive(Clone, Default)]
struct MemoryPreferences(Arc<Mutex<Stored>>);

impl MemoryPreferences {
    fn with_saved(query: &str, filter: Filter) -> Self {
        let prefs = Self::default();
        {
            let mut stored = prefs.0.lock().expect("prefs lock");
            stored.preferences.query = Some(query.to_string());
            stored.preferences.filter = filter;
        }
        prefs
    }

    fn preferences(&self) -> Preferences {
        self.0.lock().expect("prefs lock").preferences.clone()
    }

    fn history(&self) -> Vec<String> {
        self.0.lock().expect("prefs lock").history.clone()
    }
}

impl PreferencesStore for MemoryPreferences {
    fn load_preferences(&self) -> devsearch::Result<Preferences> {
        Ok(self.preferences())
    }

    fn save_preferences(&mut self, patch: &PreferencesPatch) -> devsearch::Result<()> {
        self.0.lock().expect("prefs lock").preferences.apply(patch);
        Ok(())
    }

    fn load_history(&self) -> devsearch::Result<Vec<String>> {
        Ok(self.history())
    }

    fn save_history(&mut self, entries: &[String]) -> devsearch::Result<Vec<String>> {
        let mut kept: Vec<String> = Vec::new();
        for entry in entries.iter().rev() {
            if !kept.contains(entry) {
                kept.push(entry.clone());
            }
        }
        kept.reverse();
        self.0.lock().expect("prefs lock").history.clone_from(&kept);
        Ok(kept)
    }
}

struct Harness {
    session: Session,
    backends: Arc<Backends>,
    account: Arc<Account>,
    prefs: MemoryPreferences,
}

async fn start(backends: Backends, account: Account, prefs: MemoryPreferences) -> Harness {
    let backends = Arc::new(backends);
    let account = Arc::new(account);
    let services = Services {
        backends: backends.clone(),
        account: account.clone(),
        catalogue: Arc::new(Catalogue),
    };

    let mut session = Session::new(&Config::default(), services, Box::new(prefs.clone()));
    session.bootstrap().await;
    session.settle(QUIET).await;

    Harness {
        session,
        backends,
        account,
        prefs,
    }
}

async fn type_query(harness: &mut Harness, text: &str) -> Vec<Effect> {
    harness.session.handle(&Event::InputChanged(text.to_string())).await
}

#[tokio::test(start_paused = true)]
async fn search_skips_code_while_disconnected() {
    let mut h = start(Backends::default(), Account::default(), MemoryPreferences::default()).await;

    type_query(&mut h, "buffer overflow").await;
    h.session.settle(QUIET).await;

    assert_eq!(
        h.backends.calls(),
        vec![
            (Filter::Qa, "buffer overflow".to_string()),
            (Filter::Docs, "buffer overflow".to_string()),
        ]
    );
    assert_eq!(*h.backends.doc_slugs.lock().expect("slugs lock"), vec![vec!["rust".to_string()]]);

    let state = h.session.state();
    assert_eq!(state.search.last_searched_query, "buffer overflow");
    assert_eq!(state.results[Filter::Qa].len(), 1);
    assert!(state.results[Filter::Code].items.is_empty());
    assert!(!state.results[Filter::Code].is_loading);
    assert_eq!(state.history.entries, vec!["buffer overflow"]);

    assert_eq!(h.prefs.preferences().saved_query(), Some("buffer overflow"));
    assert_eq!(h.prefs.history(), vec!["buffer overflow"]);
}

#[tokio::test(start_paused = true)]
async fn rapid_edits_collapse_into_one_search() {
    let mut h = start(Backends::default(), Account::default(), MemoryPreferences::default()).await;

    type_query(&mut h, "a").await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    type_query(&mut h, "ab").await;
    h.session.settle(QUIET).await;

    let queries: Vec<String> = h
        .backends
        .calls()
        .into_iter()
        .filter(|(filter, _)| *filter == Filter::Qa)
        .map(|(_, query)| query)
        .collect();
    assert_eq!(queries, vec!["ab"]);
    assert_eq!(h.session.state().history.entries, vec!["ab"]);
}

#[tokio::test(start_paused = true)]
async fn unchanged_query_and_filter_switch_do_not_search_again() {
    let mut h = start(Backends::default(), Account::default(), MemoryPreferences::default()).await;

    type_query(&mut h, "serde derive").await;
    h.session.settle(QUIET).await;
    h.backends.clear();

    type_query(&mut h, "serde derive  ").await;
    h.session.settle(QUIET).await;
    let effects = h.session.handle(&Event::SelectFilter(Filter::Code)).await;
    h.session.settle(QUIET).await;

    assert!(effects.is_empty());
    assert!(h.backends.calls().is_empty());
    assert_eq!(h.session.state().search.filter, Filter::Code);
    assert_eq!(h.prefs.preferences().filter, Filter::Code);
}

#[tokio::test(start_paused = true)]
async fn clearing_the_input_cancels_the_pending_search() {
    let mut h = start(Backends::default(), Account::default(), MemoryPreferences::default()).await;

    type_query(&mut h, "abc").await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    type_query(&mut h, "").await;
    h.session.settle(QUIET).await;

    assert!(h.backends.calls().is_empty());
    let state = h.session.state();
    assert!(state.search.query.is_empty());
    assert!(Filter::ALL.iter().all(|f| !state.results[*f].is_loading));
}

#[tokio::test(start_paused = true)]
async fn saved_query_is_searched_on_bootstrap_in_active_filter_order() {
    let h = start(
        Backends::default(),
        Account::with_token(),
        MemoryPreferences::with_saved("tokio select", Filter::Docs),
    )
    .await;

    assert_eq!(
        h.backends.calls(),
        vec![
            (Filter::Docs, "tokio select".to_string()),
            (Filter::Qa, "tokio select".to_string()),
            (Filter::Code, "tokio select".to_string()),
        ]
    );
    let state = h.session.state();
    assert_eq!(state.search.filter, Filter::Docs);
    assert!(state.account.is_connected);
    assert!(!state.is_loading_cached_data);
}

#[tokio::test(start_paused = true)]
async fn granted_token_reruns_code_search() {
    let mut h = start(Backends::default(), Account::default(), MemoryPreferences::default()).await;

    type_query(&mut h, "lifetimes").await;
    h.session.settle(QUIET).await;
    assert!(!h.backends.calls().iter().any(|(f, _)| *f == Filter::Code));
    h.backends.clear();

    h.account.has_token.store(true, Ordering::SeqCst);
    let effects = h.session.handle(&Event::Signal(Signal::TokenGranted)).await;
    h.session.settle(QUIET).await;

    assert!(effects.is_empty());
    assert_eq!(h.backends.calls(), vec![(Filter::Code, "lifetimes".to_string())]);
    assert!(h.session.state().account.is_connected);
}

#[tokio::test(start_paused = true)]
async fn revoked_token_disconnects_the_account() {
    let mut h = start(Backends::default(), Account::with_token(), MemoryPreferences::default()).await;
    assert!(h.session.state().account.is_connected);

    h.session.handle(&Event::Signal(Signal::TokenRevoked)).await;

    assert_eq!(h.account.disconnects.load(Ordering::SeqCst), 1);
    assert!(!h.session.state().account.is_connected);
}

#[tokio::test(start_paused = true)]
async fn doc_selection_change_reruns_only_docs() {
    let mut h = start(Backends::default(), Account::with_token(), MemoryPreferences::default()).await;

    type_query(&mut h, "async closures").await;
    h.session.settle(QUIET).await;
    h.backends.clear();

    h.session
        .handle(&Event::SetDocSourceIncluded {
            slug: "python".to_string(),
            included: true,
        })
        .await;
    h.session.settle(QUIET).await;

    assert_eq!(h.backends.calls(), vec![(Filter::Docs, "async closures".to_string())]);
    let last_slugs = h.backends.doc_slugs.lock().expect("slugs lock").last().cloned();
    assert_eq!(last_slugs, Some(vec!["rust".to_string(), "python".to_string()]));

    let saved = h.prefs.preferences().doc_sources;
    assert!(saved.iter().any(|s| s.slug == "python" && s.included));
}

#[tokio::test(start_paused = true)]
async fn superseded_response_is_discarded() {
    let backends = Backends {
        slow_query: Some(("first", Duration::from_secs(3))),
        ..Backends::default()
    };
    let mut h = start(backends, Account::default(), MemoryPreferences::default()).await;

    type_query(&mut h, "first").await;
    h.session.settle(Duration::from_millis(600)).await;
    assert!(h.session.state().results[Filter::Qa].is_loading);

    type_query(&mut h, "second").await;
    h.session.settle(Duration::from_secs(5)).await;

    let qa = &h.session.state().results[Filter::Qa];
    assert!(!qa.is_loading);
    assert_eq!(qa.items, vec![qa_item("second")]);
    assert_eq!(h.session.state().search.last_searched_query, "second");
}

#[tokio::test(start_paused = true)]
async fn docs_failure_is_reported_in_its_bucket() {
    let backends = Backends {
        fail_docs: true,
        ..Backends::default()
    };
    let mut h = start(backends, Account::default(), MemoryPreferences::default()).await;

    type_query(&mut h, "pattern matching").await;
    h.session.settle(QUIET).await;

    let state = h.session.state();
    let docs = &state.results[Filter::Docs];
    assert_eq!(docs.failure.as_deref(), Some("docs index unavailable"));
    assert!(docs.items.is_empty());
    assert_eq!(state.error_message, "docs index unavailable");
    assert_eq!(state.results[Filter::Qa].len(), 1);
}

#[tokio::test(start_paused = true)]
async fn escape_hides_window_once_overlays_are_closed() {
    let mut h = start(Backends::default(), Account::default(), MemoryPreferences::default()).await;

    type_query(&mut h, "borrow checker").await;
    h.session.settle(QUIET).await;

    h.session.handle(&Event::Confirm).await;
    assert_eq!(h.session.state().modal_item, Some(qa_item("borrow checker")));

    h.session.handle(&Event::SelectFilter(Filter::Code)).await;
    assert_eq!(h.session.state().search.filter, Filter::Qa);

    let effects = h.session.handle(&Event::OpenInBrowser).await;
    assert_eq!(
        effects,
        vec![Effect::OpenExternalLink("https://qa.example.com/q/14".to_string())]
    );

    assert!(h.session.handle(&Event::Escape).await.is_empty());
    assert!(h.session.state().modal_item.is_none());
    assert_eq!(h.session.handle(&Event::Escape).await, vec![Effect::HideMainWindow]);
}

#[tokio::test(start_paused = true)]
async fn run_loop_forwards_outbound_effects_until_events_close() {
    let h = start(Backends::default(), Account::default(), MemoryPreferences::default()).await;
    let backends = h.backends.clone();

    let (events_tx, events_rx) = tokio::sync::mpsc::unbounded_channel();
    let (outbound_tx, mut outbound_rx) = tokio::sync::mpsc::unbounded_channel();
    let task = tokio::spawn(h.session.run(events_rx, outbound_tx));

    events_tx
        .send(Event::InputChanged("iterator adapters".to_string()))
        .expect("session running");
    tokio::time::sleep(QUIET).await;
    events_tx.send(Event::Escape).expect("session running");

    assert_eq!(outbound_rx.recv().await, Some(Effect::HideMainWindow));
    assert!(backends.calls().contains(&(Filter::Qa, "iterator adapters".to_string())));

    drop(events_tx);
    task.await.expect("run loop exits cleanly");
    assert_eq!(outbound_rx.recv().await, None);
}

#[tokio::test(start_paused = true)]
async fn late_step_for_previous_query_does_not_block_the_new_one() {
    let backends = Backends {
        slow_query: Some(("first", Duration::from_millis(500))),
        ..Backends::default()
    };
    let mut h = start(backends, Account::default(), MemoryPreferences::default()).await;

    type_query(&mut h, "first").await;
    h.session.settle(Duration::from_millis(450)).await;
    assert!(h.session.state().results[Filter::Qa].is_loading);

    type_query(&mut h, "second").await;
    h.session.settle(QUIET).await;

    let qa_queries: Vec<String> = h
        .backends
        .calls()
        .into_iter()
        .filter(|(filter, _)| *filter == Filter::Qa)
        .map(|(_, query)| query)
        .collect();
    assert_eq!(qa_queries, vec!["first", "second"]);

    let state = h.session.state();
    assert_eq!(state.results[Filter::Qa].items, vec![qa_item("second")]);
    assert_eq!(state.search.last_searched_query, "second");
    assert_eq!(state.history.entries, vec!["first", "second"]);
}

#[tokio::test(start_paused = true)]
async fn clearing_the_input_stops_the_running_fan_out() {
    let backends = Backends {
        slow_query: Some(("first", Duration::from_secs(3))),
        ..Backends::default()
    };
    let mut h = start(backends, Account::default(), MemoryPreferences::default()).await;

    type_query(&mut h, "first").await;
    h.session.settle(Duration::from_millis(600)).await;
    type_query(&mut h, "").await;
    h.session.settle(Duration::from_secs(5)).await;

    assert_eq!(h.backends.calls(), vec![(Filter::Qa, "first".to_string())]);
    let state = h.session.state();
    assert!(state.search.query.is_empty());
    for filter in Filter::ALL {
        assert!(state.results[filter].items.is_empty());
        assert!(!state.results[filter].is_loading);
    }

    type_query(&mut h, "first").await;
    h.session.settle(Duration::from_secs(5)).await;

    assert_eq!(h.session.state().results[Filter::Qa].items, vec![qa_item("first")]);
    let qa_calls = h
        .backends
        .calls()
        .iter()
        .filter(|(filter, _)| *filter == Filter::Qa)
        .count();
    assert_eq!(qa_calls, 2);
}
