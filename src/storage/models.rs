//! Storage record models for the preferences document.
//!
//! These types are the on-disk representation. They are kept separate from
//! the application [`State`](crate::app::State) so the file format can evolve
//! without touching the reducer.

use crate::domain::{DocSourceSelection, Filter};
use serde::{Deserialize, Serialize};

/// Persisted user preferences restored at startup.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// Last debounced query, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    #[serde(default)]
    pub filter: Filter,

    /// Include/exclude choice per doc source slug. Empty until the user (or
    /// the first catalogue merge) has made a choice.
    #[serde(default)]
    pub doc_sources: Vec<DocSourceSelection>,

    /// Width of the Docs results pane in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results_pane_width: Option<u32>,
}

impl Preferences {
    /// The saved query, treating a blank string as absent.
    #[must_use]
    pub fn saved_query(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }

    /// Merges the fields present in `patch` into `self`.
    pub fn apply(&mut self, patch: &PreferencesPatch) {
        if let Some(query) = &patch.query {
            self.query = Some(query.clone());
        }
        if let Some(filter) = patch.filter {
            self.filter = filter;
        }
        if let Some(doc_sources) = &patch.doc_sources {
            self.doc_sources.clone_from(doc_sources);
        }
        if let Some(width) = patch.results_pane_width {
            self.results_pane_width = Some(width);
        }
    }
}

/// Partial preferences update; `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreferencesPatch {
    pub query: Option<String>,
    pub filter: Option<Filter>,
    pub doc_sources: Option<Vec<DocSourceSelection>>,
    pub results_pane_width: Option<u32>,
}

impl PreferencesPatch {
    #[must_use]
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn filter(filter: Filter) -> Self {
        Self {
            filter: Some(filter),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn doc_sources(selection: Vec<DocSourceSelection>) -> Self {
        Self {
            doc_sources: Some(selection),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn results_pane_width(width: u32) -> Self {
        Self {
            results_pane_width: Some(width),
            ..Self::default()
        }
    }
}

/// One searched query with the time it was last searched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub query: String,

    /// Unix timestamp in seconds.
    pub searched_at: i64,
}

impl HistoryRecord {
    /// Creates a record stamped with the current time.
    ///
    /// ```
    /// use devsearch::storage::HistoryRecord;
    ///
    /// let record = HistoryRecord::new("tokio::select");
    /// assert_eq!(record.query, "tokio::select");
    /// assert!(record.searched_at > 0);
    /// ```
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            searched_at: chrono::Utc::now().timestamp(),
        }
    }
}
