//! Super-admin bootstrap settings.

use serde::{Deserialize, Serialize};

/// `[bootstrap]` configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// The only email `createSuperAdmin` accepts. Unset disables bootstrap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub super_admin_email: Option<String>,
}

impl BootstrapConfig {
    /// Bootstrap config designating `email`.
    pub fn designate(email: impl Into<String>) -> Self {
        Self {
            super_admin_email: Some(email.into()),
        }
    }

    /// Whether `email` is the designated super-admin email (ASCII
    /// case-insensitive, surrounding whitespace ignored).
    pub fn is_designated(&self, email: &str) -> bool {
        self.super_admin_email
            .as_deref()
            .map(str::trim)
            .is_some_and(|designated| {
                !designated.is_empty() && designated.eq_ignore_ascii_case(email.trim())
            })
    }
}
