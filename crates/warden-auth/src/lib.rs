//! Session primitives for Warden.
//!
//! Provides:
//! - [`AuthenticatedUser`]: Identity and role claim extracted from a validated token
//! - [`TokenValidator`]: Trait for async token validation (implement per identity provider)
//! - [`AuthLayer`] / [`AuthService`]: Tower middleware parameterised over `TokenValidator`
//! - [`AuthConfig`]: Configuration for the auth layer
//! - [`AuthError`]: Auth-specific error types
//!
//! The role carried here is the session *claim*. It is good enough for
//! coarse gating but the user document stays the source of truth for
//! anything that changes roles.

mod error;
mod middleware;
mod user;

use serde::{Deserialize, Serialize};

pub use error::AuthError;
pub use middleware::{AuthLayer, AuthService};
pub use user::{AuthenticatedUser, user_from_parts};

/// Configuration for the auth middleware.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Whether authentication is enabled. When false, all requests pass
    /// through without a session.
    pub enabled: bool,
    /// Project the tokens are issued for; checked against `aud` and used
    /// to derive the expected issuer.
    pub project_id: String,
}

impl AuthConfig {
    /// Issuer expected on ID tokens for the configured project.
    pub fn expected_issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.project_id)
    }
}

/// Trait for validating tokens and extracting user identity.
///
/// Implement this for each identity provider. The middleware calls
/// `validate()` with the bearer token and returns the authenticated user
/// on success.
pub trait TokenValidator: Send + Sync + 'static {
    /// Validate a token and return the authenticated user.
    fn validate(
        &self,
        token: &str,
        config: &AuthConfig,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<AuthenticatedUser, AuthError>> + Send + '_>,
    >;
}
