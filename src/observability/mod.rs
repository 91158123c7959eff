//! Tracing with file-based OTLP export.
//!
//! `tracing` spans are bridged into OpenTelemetry and written as OTLP JSON
//! lines to `devsearch-otlp.jsonl` in the data directory:
//!
//! ```text
//! tracing → tracing-opentelemetry → FileSpanExporter → RollingFile
//! ```
//!
//! The active file rotates at 10 MB and keeps three numbered backups.
//! The filter comes from `RUST_LOG` when set, then `Config::trace_level`,
//! then `info`.
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - `exporter`: The `SpanExporter` implementation and provider builder
//! - `otlp`: OTLP JSON encoding
//! - `rolling`: Size-rotated line writer

mod exporter;
pub mod init;
mod otlp;
mod rolling;

pub use init::{init_tracing, TRACE_FILE_NAME};
