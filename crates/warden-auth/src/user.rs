//! Authenticated session identity and extraction helpers.

use warden_core::{Role, UserId};

/// An authenticated user, extracted from a validated token.
///
/// Stored in HTTP request extensions by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The user's uid (from the `sub` claim).
    pub uid: UserId,
    /// The user's email address, if the token carries one.
    pub email: Option<String>,
    /// The `role` custom claim, if set.
    ///
    /// Claims refresh only on re-authentication, so this may lag the user
    /// document after a role change.
    pub role: Option<Role>,
}

impl AuthenticatedUser {
    /// A session for `uid` with no email and no role claim.
    pub fn new(uid: impl Into<UserId>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            role: None,
        }
    }

    /// Set the email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the role claim.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }
}

/// Extract the `AuthenticatedUser` from HTTP request `Parts`, if present.
pub fn user_from_parts(parts: &http::request::Parts) -> Option<&AuthenticatedUser> {
    parts.extensions.get::<AuthenticatedUser>()
}
