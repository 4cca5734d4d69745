//! Session extraction.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use http::request::Parts;
use warden_auth::{AuthenticatedUser, user_from_parts};
use warden_core::UserId;

/// The caller's session, if the request carried a valid token.
///
/// Never rejects: handlers decide what a missing session means.
#[derive(Debug, Clone, Default)]
pub struct Session(pub Option<AuthenticatedUser>);

impl Session {
    /// The caller's uid.
    pub fn uid(&self) -> Option<&UserId> {
        self.0.as_ref().map(|user| &user.uid)
    }

    /// Whether the request carried a session.
    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Session(user_from_parts(parts).cloned()))
    }
}
