use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::SecurityConfig;

/// Length of the secret fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Identity id of the token holder
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Signing secret must not be empty")]
    InvalidSecret,

    #[error("Token subject must not be empty")]
    InvalidSubject,

    #[error("Token lifetime must be positive")]
    InvalidTtl,

    #[error("Token generation failed: {0}")]
    Generation(String),

    /// Uniform outcome for expired, forged and malformed tokens.
    #[error("Could not validate credentials")]
    Unauthenticated,
}

/// Token authority: issues and verifies signed, time-bounded bearer tokens.
///
/// Holds the process-wide signing secret for its whole lifetime. Swapping in an
/// authority built from a different secret invalidates every outstanding token.
pub struct TokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    default_ttl: Duration,
    fingerprint: String,
}

impl TokenAuthority {
    pub fn new(secret: &[u8], algorithm: Algorithm, default_ttl: Duration) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::InvalidSecret);
        }
        if default_ttl <= Duration::zero() || Utc::now().checked_add_signed(default_ttl).is_none() {
            return Err(TokenError::InvalidTtl);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            default_ttl,
            fingerprint: secret_fingerprint(secret),
        })
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, TokenError> {
        let ttl = Duration::try_minutes(security.access_token_expire_minutes).ok_or(TokenError::InvalidTtl)?;
        Self::new(security.secret_key.as_bytes(), security.algorithm, ttl)
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Truncated SHA-256 of the signing secret, safe to log.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Issue a token for `subject` using the configured lifetime.
    pub fn issue_default(&self, subject: &str) -> Result<String, TokenError> {
        self.issue(subject, self.default_ttl)
    }

    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String, TokenError> {
        self.issue_at(subject, ttl, Utc::now())
    }

    fn issue_at(&self, subject: &str, ttl: Duration, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        if subject.trim().is_empty() {
            return Err(TokenError::InvalidSubject);
        }
        if ttl <= Duration::zero() {
            return Err(TokenError::InvalidTtl);
        }

        let expires_at = issued_at.checked_add_signed(ttl).ok_or(TokenError::InvalidTtl)?;
        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Generation(e.to_string()))
    }

    /// Verify signature and expiry, returning the decoded claims.
    ///
    /// Every failure collapses to `TokenError::Unauthenticated`; the cause is
    /// only logged.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => data.claims,
            Err(e) => {
                match e.kind() {
                    ErrorKind::ExpiredSignature => tracing::debug!("rejected token: expired"),
                    ErrorKind::InvalidSignature => tracing::debug!("rejected token: signature mismatch"),
                    other => tracing::debug!("rejected token: malformed ({:?})", other),
                }
                return Err(TokenError::Unauthenticated);
            }
        };

        // The decoder accepts exp == now; a token is only valid strictly before expiry.
        if claims.exp <= now.timestamp() {
            tracing::debug!("rejected token: expired");
            return Err(TokenError::Unauthenticated);
        }
        if claims.sub.trim().is_empty() {
            tracing::debug!("rejected token: empty subject");
            return Err(TokenError::Unauthenticated);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("algorithm", &self.algorithm)
            .field("default_ttl", &self.default_ttl)
            .field("fingerprint", &self.fingerprint)
            .finish()
    }
}

/// First 8 bytes of the SHA-256 of `secret`, hex encoded.
pub fn secret_fingerprint(secret: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret);
    let result = hasher.finalize();
    hex::encode(&result[..FINGERPRINT_BYTES])
}
