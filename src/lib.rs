//! Devsearch: the search orchestration core of a keyboard-driven desktop
//! aggregator over Q&A, code and documentation backends.
//!
//! The crate owns everything between the input box and the remote services:
//! - Debouncing of query edits and doc-source selection changes
//! - Sequential per-filter fan-out with a stale-response guard
//! - A pure reducer over one central state, with a store-method dispatch surface
//! - Keyboard focus and search-history navigation
//! - Persisted preferences and bounded search history
//!
//! Rendering, native window management and the remote services themselves
//! are the host's business; they meet the core through [`app::Event`]s,
//! outbound [`app::Effect`]s and the traits in [`search::backend`].

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Host (presentation, window, account UI)            │
//! └─────────────────────────────────────────────────────┘
//!          │ Event                        ↑ outbound Effect
//! ┌─────────────────────────────────────────────────────┐
//! │  Session (session.rs)                               │  ← Single writer
//! │  - Event → handler → Store                          │
//! │  - Debounced query / doc selection                  │
//! │  - Account load and Code re-run                     │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ App Layer     │   │ Search Layer  │   │ Storage Layer │
//! │ (app/)        │   │ (search/)     │   │ (storage/)    │
//! │ - Reducer     │   │ - Debouncer   │   │ - Preferences │
//! │ - Store       │   │ - Orchestrator│   │ - History     │
//! │ - Focus/hist. │   │ - Backend API │   │ - JSON I/O    │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain & Infrastructure                            │
//! │  - Filters, result items, doc sources (domain/)     │
//! │  - Data directory resolution (infrastructure/)      │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - OpenTelemetry tracing, file-based OTLP export    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: State, reducer, store and event handling
//! - [`domain`]: Filters, result items, doc sources and errors
//! - [`infrastructure`]: Data directory resolution
//! - [`search`]: Backend traits, debouncer and orchestrator
//! - [`session`]: The runtime tying it all together
//! - [`storage`]: Preferences and history persistence
//! - [`observability`]: Tracing setup
//!
//! # Configuration
//!
//! ```toml
//! # ~/.config/devsearch/config.toml
//! debounce_ms = 400
//! doc_sources_debounce_ms = 400
//! history_limit = 50
//! default_results_pane_width = 200
//! discard_stale_responses = true
//! trace_level = "debug"
//! ```
//!
//! # Search Flow
//!
//! 1. `Event::InputChanged` updates the query immediately and feeds the debouncer
//! 2. Once input is quiet for `debounce_ms`, the stable query is compared with
//!    the last searched one; unchanged queries do nothing
//! 3. Otherwise the query is recorded in history and persisted, and the
//!    orchestrator searches Q&A, Docs and Code in turn
//! 4. Each backend call is bracketed by `StartSearch` and `SearchSucceeded`
//!    or `SearchFailed`; results from superseded searches are dropped
//!
//! # Example
//!
//! ```rust,no_run
//! use devsearch::{initialize, Config, Services};
//! use devsearch::app::Event;
//!
//! # async fn run(services: Services) -> devsearch::Result<()> {
//! let config = Config::from_file("config.toml")?;
//! let mut session = initialize(&config, services)?;
//! session.bootstrap().await;
//!
//! let effects = session.handle(&Event::InputChanged("tokio select".to_string())).await;
//! for effect in effects {
//!     // open links, hide the window...
//!     let _ = effect;
//! }
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod search;
pub mod session;
pub mod storage;

pub use app::{handle_event, Action, Effect, Event, State, Store};
pub use domain::{DevsearchError, Filter, ResultItem, Result};
pub use session::{Services, Session};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Width of the results pane before the user resizes it.
pub const DEFAULT_RESULTS_PANE_WIDTH: u32 = 200;

const DEFAULT_DEBOUNCE_MS: u64 = 400;
const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Runtime configuration.
///
/// Every field has a default, so partial files and maps are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Quiet window after the last keystroke before a search runs.
    pub debounce_ms: u64,

    /// Quiet window after the last doc-source toggle before Docs re-runs.
    pub doc_sources_debounce_ms: u64,

    /// Maximum number of distinct queries kept in history.
    pub history_limit: usize,

    /// Pane width used until a saved width is restored.
    pub default_results_pane_width: u32,

    /// Overrides the data directory. See [`infrastructure::paths`].
    pub data_dir: Option<String>,

    /// Tracing filter directive, such as `debug` or `devsearch=trace`.
    ///
    /// `RUST_LOG` takes precedence. Default: `"info"`
    pub trace_level: Option<String>,

    /// Drop results from searches superseded by a newer one.
    pub discard_stale_responses: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            doc_sources_debounce_ms: DEFAULT_DEBOUNCE_MS,
            history_limit: DEFAULT_HISTORY_LIMIT,
            default_results_pane_width: DEFAULT_RESULTS_PANE_WIDTH,
            data_dir: None,
            trace_level: None,
            discard_stale_responses: true,
        }
    }
}

impl Config {
    /// Builds a configuration from string pairs, such as host settings.
    ///
    /// Unknown keys are ignored. Values that fail to parse, or that
    /// [`Config::from_toml_str`] would reject (a zero `history_limit`), fall
    /// back to the default for that key.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use devsearch::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("debounce_ms".to_string(), "250".to_string());
    /// map.insert("history_limit".to_string(), "lots".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.debounce_ms, 250);
    /// assert_eq!(config.history_limit, 50);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str| {
            map.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            debounce_ms: parsed(map, "debounce_ms").unwrap_or(defaults.debounce_ms),
            doc_sources_debounce_ms: parsed(map, "doc_sources_debounce_ms")
                .unwrap_or(defaults.doc_sources_debounce_ms),
            history_limit: parsed(map, "history_limit")
                .filter(|&limit: &usize| limit > 0)
                .unwrap_or(defaults.history_limit),
            default_results_pane_width: parsed(map, "default_results_pane_width")
                .unwrap_or(defaults.default_results_pane_width),
            data_dir: text("data_dir"),
            trace_level: text("trace_level"),
            discard_stale_responses: parsed(map, "discard_stale_responses")
                .unwrap_or(defaults.discard_stale_responses),
        }
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`DevsearchError::Config`] if the document is malformed, a
    /// value has the wrong type, or `history_limit` is zero.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)
            .map_err(|e| DevsearchError::Config(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails
    /// [`Config::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            DevsearchError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&source)
    }

    fn validate(&self) -> Result<()> {
        if self.history_limit == 0 {
            return Err(DevsearchError::Config(
                "history_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub const fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub const fn doc_sources_debounce_window(&self) -> Duration {
        Duration::from_millis(self.doc_sources_debounce_ms)
    }
}

fn parsed<T: std::str::FromStr>(map: &BTreeMap<String, String>, key: &str) -> Option<T> {
    map.get(key).and_then(|v| v.trim().parse().ok())
}

/// Installs tracing, opens the preferences file and creates a session.
///
/// Must be called from within a tokio runtime. Tracing failures are ignored.
///
/// # Errors
///
/// Returns an error if the preferences file exists but cannot be read or
/// parsed, or if its directory cannot be created.
pub fn initialize(config: &Config, services: Services) -> Result<Session> {
    observability::init_tracing(config);
    tracing::debug!(?config, "initializing devsearch");

    let preferences = storage::JsonPreferences::new(
        infrastructure::preferences_file(config),
        config.history_limit,
    )?;
    Ok(Session::new(config, services, Box::new(preferences)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml_str("debounce_ms = 150\ntrace_level = \"debug\"\n")
            .expect("valid config");
        assert_eq!(config.debounce_window(), Duration::from_millis(150));
        assert_eq!(config.trace_level.as_deref(), Some("debug"));
        assert_eq!(config.history_limit, 50);
        assert!(config.discard_stale_responses);
    }

    #[test]
    fn wrong_type_is_a_config_error() {
        let err = Config::from_toml_str("debounce_ms = \"fast\"").expect_err("type mismatch");
        assert!(matches!(err, DevsearchError::Config(_)));
    }

    #[test]
    fn zero_history_limit_is_rejected() {
        assert!(Config::from_toml_str("history_limit = 0").is_err());
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = Config::from_file(dir.path().join("absent.toml")).expect_err("missing");
        assert!(matches!(err, DevsearchError::Config(_)));
    }

    #[test]
    fn map_values_are_trimmed_and_blank_text_ignored() {
        let map = BTreeMap::from([
            ("discard_stale_responses".to_string(), " false ".to_string()),
            ("data_dir".to_string(), "   ".to_string()),
            ("default_results_pane_width".to_string(), "320".to_string()),
        ]);
        let config = Config::from_map(&map);
        assert!(!config.discard_stale_responses);
        assert_eq!(config.data_dir, None);
        assert_eq!(config.default_results_pane_width, 320);
    }

    #[test]
    fn map_zero_history_limit_falls_back_to_default() {
        let map = BTreeMap::from([("history_limit".to_string(), "0".to_string())]);
        let config = Config::from_map(&map);
        assert_eq!(config.history_limit, 50);
        assert!(config.validate().is_ok());
    }
}
