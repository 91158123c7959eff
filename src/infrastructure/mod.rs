//! Filesystem and environment lookups.

pub mod paths;

pub use paths::{data_dir, expand_tilde, preferences_file, trace_file};
