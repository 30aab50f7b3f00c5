//! Logging setup.
//!
//! Diagnostics go to stderr through `tracing`; user-facing reports are
//! printed to stdout by the binary.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install the global subscriber. `RUST_LOG` overrides `level`; HTTP client
/// internals are capped at warn. Later calls are no-ops.
pub fn init(level: &str, json: bool) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false);

        let installed = if json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
        if installed.is_ok() {
            tracing::debug!(level, json, "logging initialised");
        }
    });
}

fn default_directives(level: &str) -> String {
    let level = match level.trim().to_ascii_lowercase().as_str() {
        "warning" => "warn".to_string(),
        l @ ("trace" | "debug" | "info" | "warn" | "error" | "off") => l.to_string(),
        _ => "info".to_string(),
    };
    format!("{level},reqwest=warn,hyper=warn,hyper_util=warn")
}
