//! Collaborator traits for the remote services.
//!
//! The core never talks HTTP itself: search backends, the Code account and
//! the doc-source catalogue are injected as trait objects. All methods are
//! async and failures are typed so the orchestrator can turn them into
//! reducer actions.

use crate::domain::{AccountError, BackendError, DocSource, ResultItem};
use async_trait::async_trait;

/// The three search services.
///
/// Each call returns items of the variant matching its filter.
#[async_trait]
pub trait SearchBackends: Send + Sync {
    /// Searches the Q&A corpus.
    async fn search_qa(&self, query: &str) -> Result<Vec<ResultItem>, BackendError>;

    /// Searches the code host. Only called while the account is connected.
    async fn search_code(&self, query: &str) -> Result<Vec<ResultItem>, BackendError>;

    /// Searches the documentation index restricted to `enabled_sources`.
    ///
    /// Never called with an empty slice.
    async fn search_docs(
        &self,
        query: &str,
        enabled_sources: &[DocSource],
    ) -> Result<Vec<ResultItem>, BackendError>;
}

/// Lifecycle of the Code backend account.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Loads stored credentials and connects.
    ///
    /// # Errors
    ///
    /// [`AccountError::NoAccessToken`] when the user never connected (benign);
    /// [`AccountError::Failed`] for everything else.
    async fn initialize(&self) -> Result<(), AccountError>;

    /// Forgets stored credentials.
    async fn disconnect(&self);
}

/// Source of the documentation catalogue.
#[async_trait]
pub trait DocCatalogue: Send + Sync {
    async fn fetch_doc_sources(&self) -> Result<Vec<DocSource>, BackendError>;
}
