//! Subscriber setup.

use super::exporter::file_tracer_provider;
use crate::infrastructure::paths;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const TRACE_FILE_NAME: &str = "devsearch-otlp.jsonl";

const DEFAULT_LEVEL: &str = "info";

/// Installs the global subscriber.
///
/// Observability is optional: if the data directory cannot be created, or a
/// subscriber is already installed, this returns `false` and logs nothing.
/// Calling it more than once is harmless.
///
/// ```rust
/// use devsearch::observability::init_tracing;
/// use devsearch::Config;
///
/// let dir = std::env::temp_dir().join("devsearch-doc");
/// let config = Config {
///     data_dir: Some(dir.display().to_string()),
///     trace_level: Some("debug".to_string()),
///     ..Config::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is active");
/// ```
pub fn init_tracing(config: &Config) -> bool {
    let trace_file = paths::trace_file(config);
    if let Some(dir) = trace_file.parent() {
        if std::fs::create_dir_all(dir).is_err() {
            return false;
        }
    }

    let resource = Resource::new(vec![
        KeyValue::new("service.name", "devsearch"),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);
    let provider = file_tracer_provider(trace_file, resource);
    let layer = OpenTelemetryLayer::new(provider.tracer("devsearch"));

    tracing_subscriber::registry()
        .with(filter(config))
        .with(layer)
        .try_init()
        .is_ok()
}

fn filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.trace_level.as_deref().unwrap_or(DEFAULT_LEVEL))
    })
}
