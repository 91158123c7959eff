//! Documentation sources and the merge with persisted selections.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A documentation set the Docs backend can search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocSource {
    /// Unique key.
    pub slug: String,
    pub name: String,
    pub is_included_in_search: bool,
}

impl DocSource {
    #[must_use]
    pub fn new(slug: impl Into<String>, name: impl Into<String>, is_included_in_search: bool) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            is_included_in_search,
        }
    }
}

/// A persisted include/exclude choice for one doc source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocSourceSelection {
    pub slug: String,
    pub included: bool,
}

/// Applies persisted selections to a freshly fetched catalogue.
///
/// Selections are matched by slug; selections for slugs no longer in the
/// catalogue are dropped. Catalogue entries without a selection keep the
/// catalogue's own default on first run (no selection persisted at all) and
/// are excluded otherwise, so a user's explicit choices are never widened.
///
/// ```
/// use devsearch::domain::{merge_selection, DocSource, DocSourceSelection};
///
/// let catalogue = vec![
///     DocSource::new("rust-std", "Rust std", false),
///     DocSource::new("mdn", "MDN", false),
/// ];
/// let saved = vec![DocSourceSelection { slug: "mdn".into(), included: true }];
/// let merged = merge_selection(catalogue, &saved);
/// assert!(!merged[0].is_included_in_search);
/// assert!(merged[1].is_included_in_search);
/// ```
#[must_use]
pub fn merge_selection(catalogue: Vec<DocSource>, selection: &[DocSourceSelection]) -> Vec<DocSource> {
    let first_run = selection.is_empty();
    let chosen: HashMap<&str, bool> = selection
        .iter()
        .map(|s| (s.slug.as_str(), s.included))
        .collect();

    catalogue
        .into_iter()
        .map(|mut source| {
            source.is_included_in_search = chosen
                .get(source.slug.as_str())
                .copied()
                .unwrap_or(first_run && source.is_included_in_search);
            source
        })
        .collect()
}

/// Extracts the persisted form of a doc-source list.
#[must_use]
pub fn selection_of(sources: &[DocSource]) -> Vec<DocSourceSelection> {
    sources
        .iter()
        .map(|s| DocSourceSelection {
            slug: s.slug.clone(),
            included: s.is_included_in_search,
        })
        .collect()
}

/// Returns only the sources the Docs backend should search.
#[must_use]
pub fn enabled_sources(sources: &[DocSource]) -> Vec<DocSource> {
    sources
        .iter()
        .filter(|s| s.is_included_in_search)
        .cloned()
        .collect()
}
