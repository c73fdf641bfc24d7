//! Credential hashing for the chat service.
//!
//! Uses Argon2id for secure password hashing. The PHC string produced by
//! [`CredentialHasher::hash`] embeds the algorithm, version, cost parameters
//! and salt, so verification never depends on the current configuration.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand_core::OsRng;
use std::sync::Arc;
use thiserror::Error;

use crate::config::AuthConfig;
use crate::ErrorKind;

/// Hashing errors.
#[derive(Error, Debug)]
pub enum HashError {
    /// Cost parameters rejected by Argon2.
    #[error("invalid argon2 parameters: {0}")]
    InvalidParams(String),

    /// Hashing failed internally.
    #[error("credential hashing failed: {0}")]
    Hashing(String),
}

impl HashError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Internal
    }
}

/// Argon2id hasher holding the configured cost parameters.
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    params: Params,
    decoy_hash: Arc<str>,
}

impl CredentialHasher {
    /// Create a hasher from the `[auth]` configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, HashError> {
        Self::with_params(
            config.argon2_memory_kib,
            config.argon2_iterations,
            config.argon2_parallelism,
        )
    }

    /// Create a hasher with explicit cost parameters.
    ///
    /// - `m_cost`: memory in KiB
    /// - `t_cost`: iterations
    /// - `p_cost`: lanes
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, HashError> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| HashError::InvalidParams(e.to_string()))?;
        let mut hasher = Self {
            params,
            decoy_hash: Arc::from(""),
        };
        hasher.decoy_hash = Arc::from(hasher.hash("decoy credential")?);
        Ok(hasher)
    }

    /// A hash with the configured cost that matches no real account.
    ///
    /// Verifying against it costs the same as verifying a stored hash, so a
    /// login for an unknown email takes as long as a wrong password.
    pub fn decoy_hash(&self) -> &str {
        &self.decoy_hash
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a secret with a fresh random salt.
    ///
    /// Returns a PHC-formatted string. Two calls with the same input produce
    /// different strings. The empty secret is hashable.
    pub fn hash(&self, secret: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2()
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| HashError::Hashing(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Check a secret against a stored PHC string.
    ///
    /// Returns false for a wrong secret and for an empty or malformed hash;
    /// never errors. The cost parameters are read from the hash itself.
    pub fn verify(&self, secret: &str, hashed: &str) -> bool {
        if hashed.is_empty() {
            return false;
        }

        let Ok(parsed) = PasswordHash::new(hashed) else {
            return false;
        };

        Argon2::default()
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok()
    }
}
