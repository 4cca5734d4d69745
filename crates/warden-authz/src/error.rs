//! Error types for warden-authz

use thiserror::Error;

use crate::action::Action;

/// Result type alias for warden-authz operations
pub type Result<T> = std::result::Result<T, AuthzError>;

/// Conditions raised at the boundary of the authorization engine.
///
/// Permission decisions themselves are plain `bool`s; these errors only
/// surface when untyped input (role or action names) cannot be mapped onto
/// the closed sets the engine works with, or when a permission table would
/// break its invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AuthzError {
    /// Role name is not one of the defined privilege levels.
    #[error("invalid role: '{0}'")]
    InvalidRole(String),

    /// Action name is not present in the permission table.
    #[error("unrecognized action: '{0}'")]
    UnrecognizedAction(String),

    /// An action was configured with no permitted roles.
    #[error("action '{0}' must permit at least one role")]
    EmptyRoleSet(Action),
}

impl AuthzError {
    /// Whether this condition is a deny-by-default rather than a fault.
    pub fn is_deny(&self) -> bool {
        matches!(self, AuthzError::UnrecognizedAction(_))
    }
}
