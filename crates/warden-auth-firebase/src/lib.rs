//! Firebase ID-token validation for Warden.
//!
//! Implements [`warden_auth::TokenValidator`] for Firebase Authentication:
//! - RS256 ID-token validation against the securetoken JWKS
//! - Issuer/audience pinned to the configured project
//! - `role` custom claim mapped onto [`warden_core::Role`]
//! - JWKS key caching with TTL-based refresh

use std::future::Future;
use std::pin::Pin;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use warden_auth::{AuthConfig, AuthError, AuthenticatedUser, TokenValidator};
use warden_core::{Role, UserId};

/// TTL for cached JWKS keys (1 hour).
const JWKS_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Public keys used to sign Firebase ID tokens.
pub const FIREBASE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// A single JSON Web Key from the JWKS endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    /// Key ID: matched against the JWT header's `kid`.
    pub kid: String,
    /// RSA modulus (base64url-encoded).
    pub n: String,
    /// RSA exponent (base64url-encoded).
    pub e: String,
}

/// The JWKS response body.
#[derive(Debug, Deserialize)]
struct JwksResponse {
    keys: Vec<Jwk>,
}

/// Cached JWKS keys with fetch timestamp.
struct CachedKeys {
    keys: Vec<Jwk>,
    fetched_at: Instant,
}

/// Firebase ID token claims.
#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    sub: String,
    email: Option<String>,
    role: Option<String>,
}

/// Firebase ID-token validator with JWKS caching.
pub struct FirebaseTokenValidator {
    cached: RwLock<Option<CachedKeys>>,
    jwks_url: String,
    http_client: Option<reqwest::Client>,
}

impl FirebaseTokenValidator {
    /// Create a new validator that fetches keys from the given JWKS URL.
    pub fn new(jwks_url: impl Into<String>) -> Self {
        Self {
            cached: RwLock::new(None),
            jwks_url: jwks_url.into(),
            http_client: Some(reqwest::Client::new()),
        }
    }

    /// Create a validator against the public Firebase JWKS endpoint.
    pub fn firebase() -> Self {
        Self::new(FIREBASE_JWKS_URL)
    }

    /// Create a validator with pre-loaded keys and no network access.
    pub fn with_static_keys(keys: Vec<Jwk>) -> Self {
        Self {
            cached: RwLock::new(Some(CachedKeys {
                keys,
                fetched_at: Instant::now(),
            })),
            jwks_url: String::new(),
            http_client: None,
        }
    }

    /// Validate a Firebase ID token for `project_id`.
    async fn validate_token(
        &self,
        token: &str,
        project_id: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        let header = decode_header(token).map_err(|e| AuthError::InvalidFormat(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidFormat("missing kid in JWT header".to_string()))?;

        let key = self.find_key(&kid).await?;
        let decoding_key = DecodingKey::from_rsa_components(&key.n, &key.e)
            .map_err(|e| AuthError::InvalidSignature(e.to_string()))?;

        let issuer = format!("https://securetoken.google.com/{project_id}");
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[project_id]);
        validation.set_issuer(&[issuer.as_str()]);

        let token_data =
            decode::<FirebaseClaims>(token, &decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
                    jsonwebtoken::errors::ErrorKind::InvalidAudience => AuthError::InvalidAudience,
                    jsonwebtoken::errors::ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
                    _ => AuthError::InvalidSignature(e.to_string()),
                }
            })?;

        Self::user_from_claims(token_data.claims)
    }

    /// Map verified claims onto a session.
    ///
    /// An unknown `role` claim rejects the token outright rather than
    /// degrading to "no role".
    fn user_from_claims(claims: FirebaseClaims) -> Result<AuthenticatedUser, AuthError> {
        if claims.sub.is_empty() {
            return Err(AuthError::MissingSubject);
        }

        let role = claims
            .role
            .map(|r| r.parse::<Role>().map_err(|_| AuthError::InvalidRoleClaim(r)))
            .transpose()?;

        Ok(AuthenticatedUser {
            uid: UserId::new(claims.sub),
            email: claims.email,
            role,
        })
    }

    /// Find a key by `kid`, fetching/refreshing the cache as needed.
    async fn find_key(&self, kid: &str) -> Result<Jwk, AuthError> {
        if let Some(key) = self.lookup_cached(kid) {
            return Ok(key);
        }

        if self.http_client.is_some() {
            self.refresh_keys().await?;
            if let Some(key) = self.lookup_cached(kid) {
                return Ok(key);
            }
        }

        Err(AuthError::NoMatchingKey(kid.to_string()))
    }

    fn lookup_cached(&self, kid: &str) -> Option<Jwk> {
        let cache = self.cached.read().ok()?;
        let cached = cache.as_ref()?;

        if self.http_client.is_some() && cached.fetched_at.elapsed() > JWKS_CACHE_TTL {
            return None;
        }

        cached.keys.iter().find(|k| k.kid == kid).cloned()
    }

    async fn refresh_keys(&self) -> Result<(), AuthError> {
        let client = self.http_client.as_ref().ok_or_else(|| {
            AuthError::JwksFetchError("no HTTP client (static keys mode)".to_string())
        })?;

        log::debug!("Refreshing JWKS from {}", self.jwks_url);
        let response: JwksResponse = client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| AuthError::JwksFetchError(e.to_string()))?
            .json()
            .await
            .map_err(|e| AuthError::JwksFetchError(e.to_string()))?;

        let mut cache = self
            .cached
            .write()
            .map_err(|e| AuthError::JwksFetchError(e.to_string()))?;

        log::info!("Cached {} signing keys", response.keys.len());
        *cache = Some(CachedKeys {
            keys: response.keys,
            fetched_at: Instant::now(),
        });

        Ok(())
    }
}

impl TokenValidator for FirebaseTokenValidator {
    fn validate(
        &self,
        token: &str,
        config: &AuthConfig,
    ) -> Pin<Box<dyn Future<Output = Result<AuthenticatedUser, AuthError>> + Send + '_>> {
        let token = token.to_string();
        let project_id = config.project_id.clone();
        Box::pin(async move { self.validate_token(&token, &project_id).await })
    }
}
