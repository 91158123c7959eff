//! Preferences backend abstraction.
//!
//! The [`PreferencesStore`] trait is the only way the session touches disk.
//! Each method maps to one moment in the session lifecycle: restore at
//! startup, persist after a debounced change, and rewrite history after a
//! search.

use crate::domain::error::Result;
use crate::storage::models::{Preferences, PreferencesPatch};

/// Abstraction over persisted preferences and search history.
///
/// Implementations are used from the session loop only, so the methods are
/// synchronous and take `&mut self` for writes.
///
/// # Implementations
///
/// - [`JsonPreferences`](crate::storage::JsonPreferences): one JSON document with atomic writes
///
/// # Examples
///
/// ```no_run
/// use devsearch::storage::{JsonPreferences, PreferencesPatch, PreferencesStore};
/// use std::path::PathBuf;
///
/// let mut store = JsonPreferences::new(PathBuf::from("/tmp/preferences.json"), 50)?;
/// store.save_preferences(&PreferencesPatch::query("lifetimes"))?;
/// let prefs = store.load_preferences()?;
/// assert_eq!(prefs.saved_query(), Some("lifetimes"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait PreferencesStore: Send {
    /// Returns the stored preferences, or defaults if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn load_preferences(&self) -> Result<Preferences>;

    /// Merges `patch` into the stored preferences.
    ///
    /// # Errors
    ///
    /// Returns an error if the write operation fails.
    fn save_preferences(&mut self, patch: &PreferencesPatch) -> Result<()>;

    /// Returns stored queries, most recent last.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn load_history(&self) -> Result<Vec<String>>;

    /// Replaces the history with `entries` and returns what was kept.
    ///
    /// Duplicates collapse onto their latest position and only the most
    /// recent entries up to the backend's limit survive. The returned list is
    /// what the caller should dispatch as the new history.
    ///
    /// # Errors
    ///
    /// Returns an error if the write operation fails.
    fn save_history(&mut self, entries: &[String]) -> Result<Vec<String>>;
}
