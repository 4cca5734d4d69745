//! Warden configuration file.
//!
//! The file is TOML, resolved from `--config`, then `WARDEN_CONFIG`, then
//! `<config_dir>/warden/config.toml`. A missing file yields the defaults.
//! A handful of environment variables override individual settings after
//! the file is read.
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:8080"
//!
//! [auth]
//! enabled = true
//! project_id = "warden-prod"
//!
//! [bootstrap]
//! super_admin_email = "root@example.com"
//!
//! [jobs]
//! time_zone = "America/New_York"
//! reminder_lead_hours = 24
//!
//! [permissions]
//! view_analytics = ["engineer", "founder", "super_admin"]
//!
//! [logging]
//! level = "info,warden=debug"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use warden_accounts::BootstrapConfig;
use warden_api::ServerConfig;
use warden_auth::AuthConfig;
use warden_auth_firebase::FIREBASE_JWKS_URL;
use warden_authz::{Authorizer, PermissionsConfig};
use warden_jobs::JobsConfig;

use crate::error::{Error, Result};

/// Project name, used for the config directory and env var prefix.
pub const PROJECT_NAME: &str = "warden";

/// Env var naming an explicit config file.
pub const CONFIG_ENV: &str = "WARDEN_CONFIG";

/// Default log filter when neither `RUST_LOG` nor `[logging]` set one.
pub const DEFAULT_LOG_LEVEL: &str = "info,warden=debug";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WardenConfig {
    /// `[server]`
    pub server: ServerConfig,
    /// `[auth]`
    pub auth: AuthSettings,
    /// `[bootstrap]`
    pub bootstrap: BootstrapConfig,
    /// `[jobs]`
    pub jobs: JobsConfig,
    /// `[permissions]`
    #[serde(skip_serializing_if = "PermissionsConfig::is_empty")]
    pub permissions: PermissionsConfig,
    /// `[logging]`
    pub logging: LoggingConfig,
}

/// `[auth]` settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Validate bearer tokens. Disabled means every request has no session.
    pub enabled: bool,
    /// Token audience.
    pub project_id: String,
    /// Where signing keys are fetched from.
    pub jwks_url: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            project_id: String::new(),
            jwks_url: FIREBASE_JWKS_URL.to_string(),
        }
    }
}

impl AuthSettings {
    /// Settings the auth middleware needs.
    pub fn to_auth_config(&self) -> AuthConfig {
        AuthConfig {
            enabled: self.enabled,
            project_id: self.project_id.clone(),
        }
    }
}

/// `[logging]` settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl WardenConfig {
    /// `<config_dir>/warden/config.toml`, if the platform has a config dir.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(PROJECT_NAME).join("config.toml"))
    }

    /// Resolve the config file from `explicit`, then the environment.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        resolve_with(explicit, |key| std::env::var(key).ok())
    }

    /// Load from the resolved path and apply environment overrides.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        let lookup = |key: &str| std::env::var(key).ok();
        let mut config = match resolve_with(explicit, lookup) {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) => {
                tracing::debug!(path = %path.display(), "No config file; using defaults");
                Self::default()
            }
            None => Self::default(),
        };
        config.apply_env(lookup);
        Ok(config)
    }

    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Apply `WARDEN_*` overrides read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(bind) = lookup("WARDEN_BIND") {
            self.server.bind = bind;
        }
        if let Some(project_id) = lookup("WARDEN_PROJECT_ID") {
            self.auth.project_id = project_id;
        }
        if let Some(email) = lookup("WARDEN_SUPER_ADMIN_EMAIL") {
            self.bootstrap.super_admin_email = Some(email);
        }
        if let Some(zone) = lookup("WARDEN_TIME_ZONE") {
            self.jobs.time_zone = zone;
        }
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Flatten into `WARDEN_SECTION_KEY=value` pairs.
    pub fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value = toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        let mut vars = Vec::new();
        flatten_env(&value, PROJECT_NAME.to_uppercase(), &mut vars);
        Ok(vars)
    }

    /// Authorizer over the configured permission table.
    pub fn authorizer(&self) -> Result<Authorizer> {
        Ok(Authorizer::new(self.permissions.build()?))
    }
}

fn resolve_with(
    explicit: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(PathBuf::from(path));
    }
    if let Some(path) = lookup(CONFIG_ENV).filter(|p| !p.trim().is_empty()) {
        return Some(PathBuf::from(path));
    }
    WardenConfig::default_config_path()
}

fn flatten_env(value: &toml::Value, prefix: String, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, child) in table {
                flatten_env(child, format!("{prefix}_{}", key.to_uppercase()), out);
            }
        }
        toml::Value::Array(items) => {
            let joined = items
                .iter()
                .map(|item| match item {
                    toml::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(",");
            out.push((prefix, joined));
        }
        toml::Value::String(s) => out.push((prefix, s.clone())),
        other => out.push((prefix, other.to_string())),
    }
}
