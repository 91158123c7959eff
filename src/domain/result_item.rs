//! Result payloads returned by the three backends.
//!
//! [`ResultItem`] is an explicit sum type: the variant, not the presence of
//! particular fields, tells which backend produced an item. The core only
//! needs an identity key per item plus the few fields used by the outbound
//! "open link" and "open in editor" actions.

use super::Filter;
use serde::{Deserialize, Serialize};

/// Lines between a preview's first line and the matched line it highlights.
const PREVIEW_MATCH_OFFSET: u32 = 3;

/// A question from the Q&A corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaResult {
    pub question_id: u64,
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub is_answered: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A snippet of a matched file, starting at `start_line` (zero-based).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePreview {
    pub start_line: u32,
    pub content: String,
}

/// A file match from the code host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeResult {
    pub repository: String,
    pub file_path: String,
    pub file_url: String,
    pub file_content: String,
    #[serde(default)]
    pub previews: Vec<FilePreview>,
}

impl CodeResult {
    /// One-based line to jump to: the match inside the first preview, or the
    /// top of the file.
    #[must_use]
    pub fn target_line(&self) -> u32 {
        self.previews
            .first()
            .map_or(1, |preview| preview.start_line + PREVIEW_MATCH_OFFSET)
    }

    /// Browser URL of the file, anchored at the first preview's match.
    ///
    /// ```
    /// use devsearch::domain::{CodeResult, FilePreview};
    ///
    /// let result = CodeResult {
    ///     repository: "rust-lang/rust".into(),
    ///     file_path: "library/alloc/src/vec/mod.rs".into(),
    ///     file_url: "https://example.com/vec/mod.rs".into(),
    ///     file_content: String::new(),
    ///     previews: vec![FilePreview { start_line: 10, content: String::new() }],
    /// };
    /// assert_eq!(result.anchored_url(), "https://example.com/vec/mod.rs#L13");
    /// ```
    #[must_use]
    pub fn anchored_url(&self) -> String {
        self.previews.first().map_or_else(
            || self.file_url.clone(),
            |preview| format!("{}#L{}", self.file_url, preview.start_line + PREVIEW_MATCH_OFFSET),
        )
    }
}

/// A page hit from the documentation index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocResult {
    pub id: String,
    pub title: String,
    pub page_url: String,
    pub doc_source_slug: String,
    #[serde(default)]
    pub excerpt: String,
}

/// A search result from any backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResultItem {
    Qa(QaResult),
    Code(CodeResult),
    Doc(DocResult),
}

impl ResultItem {
    /// The filter whose bucket this item belongs to.
    #[must_use]
    pub const fn filter(&self) -> Filter {
        match self {
            Self::Qa(_) => Filter::Qa,
            Self::Code(_) => Filter::Code,
            Self::Doc(_) => Filter::Docs,
        }
    }

    /// Identity usable as a list key, unique within one bucket.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::Qa(qa) => format!("qa:{}", qa.question_id),
            Self::Code(code) => format!("code:{}:{}", code.repository, code.file_path),
            Self::Doc(doc) => format!("doc:{}:{}", doc.doc_source_slug, doc.id),
        }
    }

    /// Link opened by the "open in browser" intent.
    #[must_use]
    pub fn external_url(&self) -> String {
        match self {
            Self::Qa(qa) => qa.link.clone(),
            Self::Code(code) => code.anchored_url(),
            Self::Doc(doc) => doc.page_url.clone(),
        }
    }
}

impl From<QaResult> for ResultItem {
    fn from(value: QaResult) -> Self {
        Self::Qa(value)
    }
}

impl From<CodeResult> for ResultItem {
    fn from(value: CodeResult) -> Self {
        Self::Code(value)
    }
}

impl From<DocResult> for ResultItem {
    fn from(value: DocResult) -> Self {
        Self::Doc(value)
    }
}
