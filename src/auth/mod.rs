//! Password hashing for server credentials.
//!
//! The client never sends a raw password. It authenticates with a hash produced
//! from a fixed salt and fixed cost parameters, so the same password always
//! yields the same credential string and the server can compare or verify it.
//! Changing the salt or costs invalidates every previously issued hash.
//!
//! Hashes are Argon2id strings in PHC format, which carry the algorithm tag,
//! version, costs, salt and digest in a single printable token:
//!
//! ```text
//! $argon2id$v=19$m=19456,t=2,p=1$bWVnYW4tcmVtb3RlLXYxIQ$<digest>
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use megan_remote::auth::{CredentialHasher, HasherConfig};
//!
//! let hasher = CredentialHasher::new(&HasherConfig::default()).unwrap();
//! let hash = hasher.hash(b"secret").unwrap();
//! assert!(hasher.verify("secret", &hash));
//! ```

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Salt shared by clients and server (B64, unpadded, 16 bytes)
pub const DEFAULT_SALT: &str = "bWVnYW4tcmVtb3RlLXYxIQ";

#[derive(Error, Debug)]
pub enum HashError {
    #[error("Invalid salt: {0}")]
    InvalidSalt(String),

    #[error("Invalid cost parameters: {0}")]
    InvalidParams(String),

    #[error("Password hashing failed: {0}")]
    Hash(String),
}

/// Salt and cost parameters of the credential hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HasherConfig {
    /// B64-encoded salt (no padding)
    pub salt: String,

    /// Memory cost in KiB
    pub memory_cost_kib: u32,

    /// Number of passes
    pub time_cost: u32,

    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            salt: DEFAULT_SALT.to_string(),
            memory_cost_kib: Params::DEFAULT_M_COST,
            time_cost: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Deterministic salted password hasher
pub struct CredentialHasher {
    salt: SaltString,
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    /// Build a hasher from explicit salt and cost parameters
    ///
    /// # Errors
    ///
    /// Returns `HashError::InvalidSalt` if the salt is not valid B64 of an acceptable
    /// length, or `HashError::InvalidParams` if the costs are out of range.
    pub fn new(config: &HasherConfig) -> Result<Self, HashError> {
        let salt = SaltString::from_b64(&config.salt)
            .map_err(|e| HashError::InvalidSalt(e.to_string()))?;
        let params = Params::new(
            config.memory_cost_kib,
            config.time_cost,
            config.parallelism,
            None,
        )
        .map_err(|e| HashError::InvalidParams(e.to_string()))?;

        Ok(Self {
            salt,
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a password into a printable credential string
    ///
    /// # Errors
    ///
    /// Returns `HashError::Hash` if the salt is too short for Argon2.
    pub fn hash(&self, password: &[u8]) -> Result<String, HashError> {
        self.argon2
            .hash_password(password, &self.salt)
            .map(|hash| hash.to_string())
            .map_err(|e| HashError::Hash(e.to_string()))
    }

    /// Check a password against a credential string.
    ///
    /// Uses the algorithm, costs and salt recorded in `hash`, so hashes produced
    /// under other parameters still verify. Malformed hashes never match.
    #[must_use]
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        self.argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialHasher")
            .field("salt", &self.salt.as_str())
            .field("params", self.argon2.params())
            .finish()
    }
}
