//! `[server]` configuration.

use serde::{Deserialize, Serialize};

/// Address the server listens on unless configured otherwise.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// `host:port` to bind.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}
