#![forbid(unsafe_code)]

//! Structured logging.
//!
//! The core emits `tracing` events under the `rclass_core` target:
//! `info` for watcher lifecycle, `debug` for every evaluation and swap, `warn`
//! when a resize is skipped. Hosts pick the subscriber; with the
//! `tracing-json` feature, [`init_json_logging`] installs a JSON formatter
//! filtered by `RUST_LOG`.

pub use tracing::{debug, error, info, trace, warn};

/// Install a global JSON subscriber. Returns `false` if one was already set.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
