//! Search plumbing: collaborator traits, debouncing and the fan-out.
//!
//! # Modules
//!
//! - [`backend`]: Async traits for the search services, account and doc catalogue
//! - [`debounce`]: Quiet-window debouncer running as a tokio task
//! - [`orchestrator`]: Sequential per-filter fan-out with stale-response guard

pub mod backend;
pub mod debounce;
pub mod orchestrator;

pub use backend::{AccountService, DocCatalogue, SearchBackends};
pub use debounce::Debouncer;
pub use orchestrator::{Orchestrator, SearchRequest, SearchToken};
