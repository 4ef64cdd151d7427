//! Password hashing and verification.

use std::fmt;

/// Work factor used when none is configured.
pub const DEFAULT_PASSWORD_COST: u32 = 14;

/// Accepted bcrypt work factors.
pub const MIN_PASSWORD_COST: u32 = 4;
pub const MAX_PASSWORD_COST: u32 = 31;

/// Turns plaintext passwords into bcrypt secret-equivalents and checks them.
///
/// The produced string embeds the salt and cost, so verification needs no
/// other input than the stored value.
#[derive(Debug, Clone, Copy)]
pub struct CredentialManager {
    cost: u32,
}

impl Default for CredentialManager {
    fn default() -> Self {
        Self::new(DEFAULT_PASSWORD_COST)
    }
}

impl CredentialManager {
    /// Create a manager with the given bcrypt cost (4..=31).
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Get the configured work factor.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password with a fresh random salt.
    ///
    /// Passwords over bcrypt's 72-byte input ceiling are rejected rather than
    /// silently truncated.
    pub fn hash(&self, password: &str) -> Result<String, HashingError> {
        bcrypt::non_truncating_hash(password, self.cost).map_err(HashingError::from)
    }

    /// Check a password against a stored secret-equivalent.
    ///
    /// Any failure, including an unparseable stored value, is a mismatch.
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        bcrypt::verify(password, stored).unwrap_or(false)
    }

    /// A well-formed stored value at the configured cost that no password
    /// matches.
    ///
    /// Verifying against it costs the same as a real check, so a lookup miss
    /// can be made as slow as a wrong password.
    pub fn decoy_hash(&self) -> String {
        format!("$2b${:02}${}", self.cost, ".".repeat(53))
    }
}

/// The password could not be transformed.
#[derive(Debug)]
pub struct HashingError(bcrypt::BcryptError);

impl fmt::Display for HashingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Password hashing failed: {}", self.0)
    }
}

impl std::error::Error for HashingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<bcrypt::BcryptError> for HashingError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self(err)
    }
}
