#![forbid(unsafe_code)]

//! JSON logging bootstrap for production hosts.
//!
//! The filter is read from `WBIND_LOG` (same syntax as `RUST_LOG`) and falls
//! back to `info` when unset or unparsable. Installing twice is harmless:
//! the second call reports `false`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const ENV_LOG_FILTER: &str = "WBIND_LOG";

const DEFAULT_FILTER: &str = "info";

/// Install a global JSON subscriber. Returns `false` if one was already set.
pub fn init_json_logging() -> bool {
    let raw = std::env::var(ENV_LOG_FILTER).ok();
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter_from(raw.as_deref()))
        .with_current_span(true)
        .try_init()
        .is_ok()
}

fn filter_from(raw: Option<&str>) -> EnvFilter {
    raw.and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}
