//! Identity Tokens
//!
//! Stateless, signed, time-limited tokens (HS256 JWT) carrying
//! `{ sub, iat, exp }`.
//!
//! ## Security Model
//! - The signing secret is loaded once at startup and never mutated
//! - Verification fails closed: every failure collapses into
//!   [`TokenError::Invalid`], so callers cannot tell an expired token from
//!   a forged one
//! - No server-side revocation; a token lives until `exp`
//! - Expiry is checked against an injected [`Clock`] with zero leeway

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::clock::Clock;
use crate::crypto::{from_base64, random_bytes};

/// Default token lifetime (7 days)
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 3600);

/// Minimum signing secret length for HS256 (RFC 7518 §3.2)
pub const MIN_SECRET_LEN: usize = 32;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum TokenError {
    /// Malformed, wrongly signed, or expired. Deliberately uninformative.
    #[error("Token is invalid or expired")]
    Invalid,

    #[error("Cannot issue a token for an empty subject")]
    EmptySubject,

    #[error("Token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Signing secret configuration errors (fatal at startup)
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Signing secret must be at least {min} bytes (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Signing secret is not valid base64")]
    Encoding(#[from] base64::DecodeError),
}

// ============================================================================
// Signing Secret
// ============================================================================

/// Process-wide HMAC signing secret
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub fn new(bytes: Vec<u8>) -> Result<Self, SecretError> {
        if bytes.len() < MIN_SECRET_LEN {
            return Err(SecretError::TooShort {
                min: MIN_SECRET_LEN,
                actual: bytes.len(),
            });
        }
        Ok(Self(bytes))
    }

    pub fn from_base64(encoded: &str) -> Result<Self, SecretError> {
        Self::new(from_base64(encoded)?)
    }

    /// Random secret (development only: tokens die with the process)
    pub fn generate() -> Self {
        Self(random_bytes(MIN_SECRET_LEN))
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningSecret")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Claims
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Result of a successful verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

// ============================================================================
// Token Service
// ============================================================================

/// Issues and verifies identity tokens
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(secret: &SigningSecret, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against `clock`, not the system time
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
            clock,
        }
    }

    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }

    /// Issue a token bound to `subject`
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        if subject.is_empty() {
            return Err(TokenError::EmptySubject);
        }

        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Verify signature and expiry
    ///
    /// Any failure yields [`TokenError::Invalid`]; the concrete reason is
    /// only logged at debug level.
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(reason = %e, "Token rejected");
                TokenError::Invalid
            })?
            .claims;

        let now = self.clock.now().timestamp();
        if now >= claims.exp {
            tracing::debug!(exp = claims.exp, now, "Token rejected: expired");
            return Err(TokenError::Invalid);
        }

        if claims.sub.is_empty() {
            tracing::debug!("Token rejected: empty subject");
            return Err(TokenError::Invalid);
        }

        let issued_at = DateTime::from_timestamp(claims.iat, 0).ok_or(TokenError::Invalid)?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or(TokenError::Invalid)?;

        Ok(VerifiedToken {
            subject: claims.sub,
            issued_at,
            expires_at,
        })
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
