//! Application layer: state, reducer, store and intent handling.
//!
//! This module sits between presentation (external) and the session runtime.
//! It owns every rule about how the search state may change.
//!
//! # Architecture
//!
//! The layer follows a unidirectional data flow:
//!
//! ```text
//! Event → handle_event → Store::dispatch(Action) → reduce → State
//!              │                    ↑
//!              ↓                    │
//!           Effects ──→ Session ──→ Orchestrator / account task
//! ```
//!
//! # Modules
//!
//! - [`actions`]: State transitions understood by the reducer
//! - [`reducer`]: The pure `(State, Action) -> State` function
//! - [`store`]: Owned state container
//! - [`dispatch`]: One store method per user-visible intent
//! - [`focus`]: Bounds-checked cursor movement
//! - [`history`]: Search history recording and browsing
//! - [`handler`]: Event routing and side-effect emission
//! - [`modes`]: Which surface owns directional input
//! - [`state`]: Central state container and selectors
//!
//! # Example
//!
//! ```rust
//! use devsearch::app::{handle_event, Event, Store};
//!
//! let mut store = Store::default();
//! let (changed, _effects) = handle_event(&mut store, &Event::NavigateDown);
//! assert!(!changed);
//! ```

pub mod actions;
pub mod dispatch;
pub mod focus;
pub mod handler;
pub mod history;
pub mod modes;
pub mod reducer;
pub mod state;
pub mod store;

pub use actions::Action;
pub use focus::{navigate, select_direct, Direction};
pub use handler::{handle_event, Effect, Event, Signal};
pub use modes::UiMode;
pub use reducer::reduce;
pub use state::{
    AccountState, AccountStatus, FocusIntent, FocusedIndex, HistoryState, LayoutState, ResultBucket,
    ResultBuckets, SearchState, State,
};
pub use store::Store;
