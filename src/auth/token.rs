//! Signed bearer tokens.
//!
//! Tokens are HS256 JWTs carrying the subject (user ID), issue time,
//! not-before, expiry and a random token ID. Verification uses zero leeway.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind as JwtErrorKind, Algorithm, DecodingKey, EncodingKey,
    Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::ErrorKind;

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

/// Token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Not valid before this timestamp.
    pub nbf: i64,
    /// Expiration timestamp.
    pub exp: i64,
    /// Token ID, unique per issued token.
    pub jti: String,
}

/// Token errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The signing secret is empty.
    #[error("token secret must not be empty")]
    EmptySecret,

    /// Signing failed.
    #[error("token signing failed: {0}")]
    Signing(String),

    /// The token expired.
    #[error("token expired")]
    Expired,

    /// The token's not-before time is in the future.
    #[error("token not yet valid")]
    NotYetValid,

    /// The signature does not match.
    #[error("invalid token signature")]
    InvalidSignature,

    /// The subject is not a user ID.
    #[error("invalid token subject")]
    InvalidSubject,

    /// Structurally invalid token or unexpected algorithm.
    #[error("malformed token: {0}")]
    Malformed(String),
}

impl TokenError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TokenError::EmptySecret | TokenError::Signing(_) => ErrorKind::Internal,
            TokenError::Expired
            | TokenError::NotYetValid
            | TokenError::InvalidSignature
            | TokenError::InvalidSubject
            | TokenError::Malformed(_) => ErrorKind::Unauthenticated,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            JwtErrorKind::ExpiredSignature => TokenError::Expired,
            JwtErrorKind::ImmatureSignature => TokenError::NotYetValid,
            JwtErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed(e.to_string()),
        }
    }
}

/// Shorten a token for log output.
pub fn mask_token(token: &str) -> String {
    let prefix: String = token.chars().take(8).collect();
    format!("{prefix}...")
}

/// Issues and verifies bearer tokens with a shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
    masked_secret: String,
}

impl TokenService {
    /// Create a token service from a secret and token lifetime in seconds.
    pub fn new(secret: &str, ttl_secs: u64) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "nbf", "sub"]);

        let ttl_secs = i64::try_from(ttl_secs).unwrap_or(i64::MAX);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::try_seconds(ttl_secs).unwrap_or(Duration::MAX),
            masked_secret: mask_secret(secret),
        })
    }

    /// Token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The secret's first characters, safe for diagnostics.
    pub fn masked_secret(&self) -> &str {
        &self.masked_secret
    }

    /// Issue a token for `subject`.
    pub fn issue(&self, subject: Uuid) -> Result<String, TokenError> {
        let now = Utc::now();
        let expires = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::Signing("token expiry out of range".to_string()))?;
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token and return its subject.
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Uuid::parse_str(&data.claims.sub).map_err(|_| TokenError::InvalidSubject)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &self.masked_secret)
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish()
    }
}

fn mask_secret(secret: &str) -> String {
    let prefix: String = secret.chars().take(4).collect();
    format!("{prefix}***")
}
