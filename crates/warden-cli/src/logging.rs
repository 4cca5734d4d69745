//! Subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

/// Filter from `rust_log` when set and valid, else from `level`.
pub fn filter(level: &str, rust_log: Option<&str>) -> Result<EnvFilter> {
    if let Some(directives) = rust_log.filter(|d| !d.trim().is_empty()) {
        match EnvFilter::try_new(directives) {
            Ok(filter) => return Ok(filter),
            Err(err) => eprintln!("Ignoring invalid RUST_LOG '{directives}': {err}"),
        }
    }
    EnvFilter::try_new(level).map_err(|e| Error::config(format!("Invalid log level '{level}': {e}")))
}

/// Install the global fmt subscriber. `log` records are forwarded to it.
pub fn init(level: &str) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = filter(level, rust_log.as_deref())?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| Error::config(format!("Failed to install logger: {e}")))
}
