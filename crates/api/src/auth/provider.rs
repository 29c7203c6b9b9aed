//! Identity-provider capability and its JWT implementation.
//!
//! Handlers never see provider-specific logic: they depend on the
//! [`IdentityProvider`] trait, which turns a bearer token into verified
//! [`Claims`]. The default implementation validates signatures locally
//! with `jsonwebtoken` against the provider's published key material
//! (RS256 public key) or, for development, an HS256 shared secret.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims extracted from a verified access token.
///
/// `sub` is the provider's stable subject id and keys the local user
/// record; profile claims are refreshed into that record per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject -- the identity provider's stable user id.
    pub sub: String,
    /// Expiration time (UTC Unix timestamp). Checked during validation.
    pub exp: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Errors surfaced while verifying a token.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The token failed signature, audience, or expiry validation.
    #[error("token rejected: {0}")]
    InvalidToken(String),

    /// The configured key material could not be used.
    #[error("verifier configuration error: {0}")]
    Configuration(String),
}

/// Capability for validating access tokens issued by the external
/// identity provider.
///
/// Async so an implementation may fetch remote key sets; the bundled JWT
/// verifier works purely locally.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify_token(&self, token: &str) -> Result<Claims, AuthError>;
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Key material for token verification.
#[derive(Debug, Clone)]
pub enum AuthKey {
    /// RS256 public key in PEM form (production).
    Rs256PublicKeyPem(String),
    /// HS256 shared secret (development and tests).
    Hs256Secret(String),
}

/// Token-verification settings loaded from the environment.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub key: AuthKey,
    /// Expected `aud` claim, if the provider sets one.
    pub audience: Option<String>,
    /// Expected `iss` claim, if the provider sets one.
    pub issuer: Option<String>,
}

impl AuthConfig {
    /// Load verification settings from environment variables.
    ///
    /// | Env Var                    | Required          |
    /// |----------------------------|-------------------|
    /// | `AUTH_RS256_PUBLIC_KEY_PEM`| one of these two  |
    /// | `AUTH_HS256_SECRET`        | one of these two  |
    /// | `AUTH_AUDIENCE`            | no                |
    /// | `AUTH_ISSUER`              | no                |
    ///
    /// # Panics
    ///
    /// Panics if neither key variable is set. Misconfigured auth must
    /// fail at startup, not at the first request.
    pub fn from_env() -> Self {
        let key = if let Ok(pem) = std::env::var("AUTH_RS256_PUBLIC_KEY_PEM") {
            AuthKey::Rs256PublicKeyPem(pem)
        } else if let Ok(secret) = std::env::var("AUTH_HS256_SECRET") {
            assert!(!secret.is_empty(), "AUTH_HS256_SECRET must not be empty");
            AuthKey::Hs256Secret(secret)
        } else {
            panic!("AUTH_RS256_PUBLIC_KEY_PEM or AUTH_HS256_SECRET must be set");
        };

        Self {
            key,
            audience: std::env::var("AUTH_AUDIENCE").ok(),
            issuer: std::env::var("AUTH_ISSUER").ok(),
        }
    }
}

// ---------------------------------------------------------------------------
// JWT implementation
// ---------------------------------------------------------------------------

/// [`IdentityProvider`] backed by local `jsonwebtoken` validation.
pub struct JwtIdentityProvider {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityProvider {
    /// Build a verifier from configuration.
    ///
    /// Fails if the RS256 PEM cannot be parsed.
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let (decoding_key, algorithm) = match &config.key {
            AuthKey::Rs256PublicKeyPem(pem) => {
                let key = DecodingKey::from_rsa_pem(pem.as_bytes())
                    .map_err(|e| AuthError::Configuration(format!("invalid RS256 PEM: {e}")))?;
                (key, Algorithm::RS256)
            }
            AuthKey::Hs256Secret(secret) => {
                (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256)
            }
        };

        let mut validation = Validation::new(algorithm);
        if let Some(aud) = &config.audience {
            validation.set_audience(&[aud]);
        }
        if let Some(iss) = &config.issuer {
            validation.set_issuer(&[iss]);
        }

        Ok(Self {
            decoding_key,
            validation,
        })
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        Ok(data.claims)
    }
}
