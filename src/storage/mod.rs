//! Storage layer for persisted preferences and search history.
//!
//! # Modules
//!
//! - `backend`: [`PreferencesStore`] trait used by the session
//! - `json`: JSON document implementation with atomic writes
//! - `models`: On-disk record types separate from the application state

pub mod backend;
pub mod json;
pub mod models;

pub use backend::PreferencesStore;
pub use json::JsonPreferences;
pub use models::{HistoryRecord, Preferences, PreferencesPatch};
