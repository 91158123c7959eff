//! JSON file-based preferences backend.
//!
//! Preferences and history live in one human-readable JSON document. Writes
//! go to a temporary file that is then renamed over the target, so a crash
//! never leaves a truncated document behind.

use crate::domain::error::{DevsearchError, Result};
use crate::storage::backend::PreferencesStore;
use crate::storage::models::{HistoryRecord, Preferences, PreferencesPatch};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

const FORMAT_VERSION: u32 = 1;

/// Top-level document serialized to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PreferencesData {
    /// Version of the document format for future migrations.
    version: u32,

    #[serde(default)]
    preferences: Preferences,

    /// Searched queries, most recent last.
    #[serde(default)]
    history: Vec<HistoryRecord>,
}

impl Default for PreferencesData {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            preferences: Preferences::default(),
            history: Vec::new(),
        }
    }
}

/// JSON file preferences backend.
///
/// The whole document is kept in memory and persisted after every change.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "preferences": {
///     "query": "tokio select",
///     "filter": "docs",
///     "doc_sources": [{ "slug": "rust-std", "included": true }],
///     "results_pane_width": 240
///   },
///   "history": [
///     { "query": "tokio select", "searched_at": 1700000000 }
///   ]
/// }
/// ```
pub struct JsonPreferences {
    file_path: PathBuf,
    data: PreferencesData,
    history_limit: usize,

    /// Tracks if data has been modified since last save.
    dirty: bool,
}

impl JsonPreferences {
    /// Creates or opens the preferences document.
    ///
    /// Parent directories are created automatically. `history_limit` bounds
    /// how many queries [`PreferencesStore::save_history`] keeps.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - File exists but contains invalid JSON
    /// - File permissions prevent reading
    pub fn new(file_path: PathBuf, history_limit: usize) -> Result<Self> {
        tracing::debug!(path = ?file_path, history_limit, "initializing JSON preferences");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty preferences");
            PreferencesData::default()
        };

        Ok(Self {
            file_path,
            data,
            history_limit,
            dirty: false,
        })
    }

    fn load_from_file(path: &Path) -> Result<PreferencesData> {
        let contents = std::fs::read_to_string(path)?;
        let data: PreferencesData = serde_json::from_str(&contents)
            .map_err(|e| DevsearchError::Storage(format!("failed to parse JSON: {e}")))?;

        tracing::debug!(
            version = data.version,
            history = data.history.len(),
            doc_sources = data.preferences.doc_sources.len(),
            "loaded preferences"
        );

        Ok(data)
    }

    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| DevsearchError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "preferences saved");
        Ok(())
    }

    /// Collapses duplicates onto their last position and keeps the newest
    /// `limit` queries. The final entry is stamped as searched now.
    fn rebuild_history(&self, entries: &[String]) -> Vec<HistoryRecord> {
        let stamps: HashMap<&str, i64> = self
            .data
            .history
            .iter()
            .map(|r| (r.query.as_str(), r.searched_at))
            .collect();

        let mut seen = HashSet::new();
        let mut kept: Vec<&str> = entries
            .iter()
            .rev()
            .map(|q| q.trim())
            .filter(|q| !q.is_empty() && seen.insert(*q))
            .take(self.history_limit)
            .collect();
        kept.reverse();

        let newest = kept.len().saturating_sub(1);
        kept.into_iter()
            .enumerate()
            .map(|(i, query)| match stamps.get(query) {
                Some(&searched_at) if i != newest => HistoryRecord {
                    query: query.to_string(),
                    searched_at,
                },
                _ => HistoryRecord::new(query),
            })
            .collect()
    }
}

impl PreferencesStore for JsonPreferences {
    fn load_preferences(&self) -> Result<Preferences> {
        let _span = tracing::debug_span!("json_load_preferences").entered();
        Ok(self.data.preferences.clone())
    }

    fn save_preferences(&mut self, patch: &PreferencesPatch) -> Result<()> {
        let _span = tracing::debug_span!("json_save_preferences", patch = ?patch).entered();

        self.data.preferences.apply(patch);
        self.dirty = true;
        self.save_to_file()
    }

    fn load_history(&self) -> Result<Vec<String>> {
        let _span = tracing::debug_span!("json_load_history").entered();

        let entries: Vec<String> = self.data.history.iter().map(|r| r.query.clone()).collect();
        tracing::debug!(count = entries.len(), "retrieved history");
        Ok(entries)
    }

    fn save_history(&mut self, entries: &[String]) -> Result<Vec<String>> {
        let _span = tracing::debug_span!("json_save_history", count = entries.len()).entered();

        self.data.history = self.rebuild_history(entries);
        self.dirty = true;
        self.save_to_file()?;

        let kept: Vec<String> = self.data.history.iter().map(|r| r.query.clone()).collect();
        tracing::debug!(kept = kept.len(), "history saved");
        Ok(kept)
    }
}

impl Drop for JsonPreferences {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty preferences on drop");
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DocSourceSelection, Filter};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonPreferences::new(dir.path().join("nested/preferences.json"), 10)
            .expect("open store");
        let prefs = store.load_preferences().expect("load");
        assert_eq!(prefs, Preferences::default());
        assert!(store.load_history().expect("history").is_empty());
    }

    #[test]
    fn patches_merge_and_survive_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("preferences.json");

        {
            let mut store = JsonPreferences::new(path.clone(), 10).expect("open store");
            store
                .save_preferences(&PreferencesPatch::query("pin projection"))
                .expect("save query");
            store
                .save_preferences(&PreferencesPatch::filter(Filter::Docs))
                .expect("save filter");
            store
                .save_preferences(&PreferencesPatch::doc_sources(vec![DocSourceSelection {
                    slug: "rust-std".into(),
                    included: false,
                }]))
                .expect("save selection");
        }

        let store = JsonPreferences::new(path, 10).expect("reopen store");
        let prefs = store.load_preferences().expect("load");
        assert_eq!(prefs.saved_query(), Some("pin projection"));
        assert_eq!(prefs.filter, Filter::Docs);
        assert_eq!(prefs.doc_sources.len(), 1);
        assert_eq!(prefs.results_pane_width, None);
    }

    #[test]
    fn history_deduplicates_onto_latest_position() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store =
            JsonPreferences::new(dir.path().join("preferences.json"), 10).expect("open store");

        let kept = store
            .save_history(&strings(&["serde", "tokio", "axum", "serde"]))
            .expect("save");
        assert_eq!(kept, strings(&["tokio", "axum", "serde"]));
    }

    #[test]
    fn history_is_bounded_to_newest_entries() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store =
            JsonPreferences::new(dir.path().join("preferences.json"), 2).expect("open store");

        let kept = store
            .save_history(&strings(&["one", "two", "three"]))
            .expect("save");
        assert_eq!(kept, strings(&["two", "three"]));
        assert_eq!(store.load_history().expect("load"), kept);
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, "{ not json").expect("write");

        let err = JsonPreferences::new(path, 10).err().expect("should fail");
        assert!(matches!(err, DevsearchError::Storage(_)));
    }
}
