//! Domain layer for devsearch.
//!
//! Core data types shared by every layer, independent of the runtime and of
//! any backend client.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`filter`]: The three search domains and their fan-out order
//! - [`result_item`]: Backend result payloads as one sum type
//! - [`doc_source`]: Documentation sources and selection merging

pub mod doc_source;
pub mod error;
pub mod filter;
pub mod result_item;

pub use doc_source::{enabled_sources, merge_selection, selection_of, DocSource, DocSourceSelection};
pub use error::{AccountError, BackendError, DevsearchError, Result};
pub use filter::Filter;
pub use result_item::{CodeResult, DocResult, FilePreview, QaResult, ResultItem};
