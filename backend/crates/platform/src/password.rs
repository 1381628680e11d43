//! Password Hashing and Verification
//!
//! bcrypt with a fixed work factor:
//! - Salted, deliberately expensive one-way hash
//! - Constant-time comparison inside the primitive
//! - Zeroization of clear-text input
//! - Malformed stored hashes verify as `false` instead of erroring
//!
//! The clear-text password is never stored and never appears in `Debug`
//! output or logs.

use std::fmt;

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length in characters
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// bcrypt only reads the first 72 bytes; longer input is rejected
/// rather than silently truncated.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Lowest and highest cost bcrypt accepts
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} bytes (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

/// Hashing primitive failure
///
/// Not caused by the user. Callers abort the operation (e.g. registration
/// cannot proceed) but the process keeps running.
#[derive(Debug, Error)]
pub enum HashingError {
    #[error("Password hashing failed: {0}")]
    Primitive(#[source] bcrypt::BcryptError),

    #[error("bcrypt cost must be between 4 and 31 (got {0})")]
    InvalidCost(u32),
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// - No `Clone`, so copies cannot be made by accident
/// - `Debug` is redacted
/// - Unicode is normalized with NFKC so the same password typed on
///   different keyboards hashes identically
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create from user input for a *new* password, enforcing the policy
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let password = Self::for_verification(raw);
        password.check_policy()?;
        Ok(password)
    }

    /// Create from user input that is only going to be compared against a
    /// stored hash (sign-in, security answers)
    ///
    /// No policy is applied: a password that predates the policy must
    /// still be able to sign in.
    pub fn for_verification(mut raw: String) -> Self {
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();
        Self(normalized)
    }

    fn check_policy(&self) -> Result<(), PasswordPolicyError> {
        if self.0.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let char_count = self.0.chars().count();
        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        let byte_len = self.0.len();
        if byte_len > MAX_PASSWORD_BYTES {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_BYTES,
                actual: byte_len,
            });
        }

        if self
            .0
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        Ok(())
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// bcrypt hash in modular crypt format (`$2b$10$...`)
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Wrap a hash read back from storage
    ///
    /// Not validated here: a malformed value simply never verifies.
    pub fn from_stored(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Cost segment of the hash, if it parses
    pub fn cost(&self) -> Option<u32> {
        let mut parts = self.0.split('$');
        // "", "2b", "10", salt+hash
        match (parts.next(), parts.next(), parts.next()) {
            (Some(""), Some(_), Some(cost)) => cost.parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HashedPassword").field(&"[HASH]").finish()
    }
}

// ============================================================================
// Hasher
// ============================================================================

/// Credential hasher with a fixed bcrypt work factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: Self::DEFAULT_COST,
        }
    }
}

impl PasswordHasher {
    /// Work factor used in production
    pub const DEFAULT_COST: u32 = 10;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cost(cost: u32) -> Result<Self, HashingError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(HashingError::InvalidCost(cost));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a clear-text password with a fresh random salt
    pub fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, HashingError> {
        bcrypt::hash(password.as_bytes(), self.cost)
            .map(HashedPassword)
            .map_err(HashingError::Primitive)
    }

    /// Verify a clear-text password against a stored hash
    ///
    /// ## Returns
    /// - `Ok(true)` on match
    /// - `Ok(false)` on mismatch or when the stored hash is malformed
    /// - `Err(_)` only for unexpected primitive failures
    pub fn verify(
        &self,
        password: &ClearTextPassword,
        hashed: &HashedPassword,
    ) -> Result<bool, HashingError> {
        use bcrypt::BcryptError;

        match bcrypt::verify(password.as_bytes(), hashed.as_str()) {
            Ok(matches) => Ok(matches),
            Err(
                BcryptError::InvalidHash(_)
                | BcryptError::InvalidPrefix(_)
                | BcryptError::InvalidCost(_)
                | BcryptError::CostNotAllowed(_)
                | BcryptError::InvalidSaltLen(_)
                | BcryptError::InvalidBase64(_),
            ) => {
                tracing::warn!("Stored password hash is malformed");
                Ok(false)
            }
            Err(e) => Err(HashingError::Primitive(e)),
        }
    }

    /// Whether a stored hash was produced with a different work factor
    pub fn needs_rehash(&self, hashed: &HashedPassword) -> bool {
        hashed.cost() != Some(self.cost)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::with_cost(MIN_COST).unwrap()
    }

    fn pw(raw: &str) -> ClearTextPassword {
        ClearTextPassword::for_verification(raw.to_string())
    }

    #[test]
    fn test_policy_too_short() {
        let result = ClearTextPassword::new("12345".to_string());
        assert_eq!(
            result.unwrap_err(),
            PasswordPolicyError::TooShort { min: 6, actual: 5 }
        );
    }

    #[test]
    fn test_policy_too_long_counts_bytes() {
        // 25 three-byte characters = 75 bytes
        let result = ClearTextPassword::new("パ".repeat(25));
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
    }

    #[test]
    fn test_policy_whitespace_only() {
        let result = ClearTextPassword::new("        ".to_string());
        assert_eq!(result.unwrap_err(), PasswordPolicyError::EmptyOrWhitespace);
    }

    #[test]
    fn test_policy_control_character() {
        let result = ClearTextPassword::new("abc\u{7}defgh".to_string());
        assert_eq!(result.unwrap_err(), PasswordPolicyError::InvalidCharacter);
    }

    #[test]
    fn test_policy_accepts_reasonable_password() {
        assert!(ClearTextPassword::new("newpass".to_string()).is_ok());
        assert!(ClearTextPassword::new("パスワード安全です".to_string()).is_ok());
    }

    #[test]
    fn test_verification_input_skips_policy() {
        // Too short for a new password, but must still be comparable
        let password = pw("123");
        let hashed = fast_hasher().hash(&password).unwrap();
        assert!(fast_hasher().verify(&password, &hashed).unwrap());
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = fast_hasher();
        let hashed = hasher.hash(&pw("plainPassword123")).unwrap();

        assert!(hasher.verify(&pw("plainPassword123"), &hashed).unwrap());
        assert!(!hasher.verify(&pw("plainPassword124"), &hashed).unwrap());
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = fast_hasher();
        let a = hasher.hash(&pw("same password")).unwrap();
        let b = hasher.hash(&pw("same password")).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_nfkc_normalization() {
        // Full-width "Ａ" normalizes to "A"
        let hasher = fast_hasher();
        let hashed = hasher.hash(&pw("Ａbcdef1")).unwrap();
        assert!(hasher.verify(&pw("Abcdef1"), &hashed).unwrap());
    }

    #[test]
    fn test_malformed_hash_verifies_false() {
        let hasher = fast_hasher();
        for stored in ["", "not_a_hash", "$2b$10$tooshort", "$9z$10$abcdefghijklmnopqrstuv"] {
            let hashed = HashedPassword::from_stored(stored);
            assert!(!hasher.verify(&pw("anything"), &hashed).unwrap(), "{stored}");
        }
    }

    #[test]
    fn test_default_cost_is_ten() {
        let hasher = PasswordHasher::new();
        assert_eq!(hasher.cost(), 10);
    }

    #[test]
    fn test_invalid_cost_rejected() {
        assert!(matches!(
            PasswordHasher::with_cost(3),
            Err(HashingError::InvalidCost(3))
        ));
        assert!(PasswordHasher::with_cost(32).is_err());
    }

    #[test]
    fn test_needs_rehash() {
        let hasher = fast_hasher();
        let hashed = hasher.hash(&pw("rehash me")).unwrap();
        assert_eq!(hashed.cost(), Some(MIN_COST));
        assert!(!hasher.needs_rehash(&hashed));
        assert!(PasswordHasher::new().needs_rehash(&hashed));
        assert!(hasher.needs_rehash(&HashedPassword::from_stored("garbage")));
    }

    #[test]
    fn test_debug_redaction() {
        let password = pw("secret-value");
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret-value"));

        let hashed = fast_hasher().hash(&password).unwrap();
        assert!(!format!("{:?}", hashed).contains("$2"));
    }
}
