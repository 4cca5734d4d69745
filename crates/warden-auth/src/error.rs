//! Auth-specific error types.

/// Errors that can occur during authentication.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header or bearer token present.
    #[error("missing authentication token")]
    MissingToken,

    /// Token format is invalid (not a valid JWT).
    #[error("invalid token format: {0}")]
    InvalidFormat(String),

    /// JWT signature verification failed.
    #[error("invalid token signature: {0}")]
    InvalidSignature(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// Token audience doesn't match the configured project.
    #[error("invalid audience")]
    InvalidAudience,

    /// Token issuer doesn't match the configured project.
    #[error("invalid issuer")]
    InvalidIssuer,

    /// Token has an empty subject (no uid).
    #[error("token missing subject")]
    MissingSubject,

    /// The `role` custom claim is present but not a known role.
    #[error("invalid role claim: '{0}'")]
    InvalidRoleClaim(String),

    /// Failed to fetch JWKS from the identity provider.
    #[error("failed to fetch JWKS: {0}")]
    JwksFetchError(String),

    /// No key in the JWKS matches the token's kid.
    #[error("no matching key for kid '{0}'")]
    NoMatchingKey(String),
}

impl AuthError {
    /// Whether this error should result in a 401 (vs. a 500).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, AuthError::JwksFetchError(_))
    }
}
