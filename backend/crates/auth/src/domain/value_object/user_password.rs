//! User Password Value Object
//!
//! Domain value object for user credentials. Delegates to
//! `platform::password` for cryptographic operations.
//!
//! The same pair of types carries the security answer: it is a shared
//! secret and is hashed exactly like a password.
//!
//! ## Usage
//! ```rust
//! use auth::domain::value_object::user_password::{RawPassword, UserPassword};
//! use platform::password::PasswordHasher;
//!
//! let hasher = PasswordHasher::with_cost(4)?;
//! let raw = RawPassword::new("newpass".to_string())?;
//! let hashed = UserPassword::from_raw(&raw, &hasher)?;
//! assert!(hashed.verify(&raw, &hasher)?);
//! # Ok::<(), auth::AuthError>(())
//! ```

use platform::password::{ClearTextPassword, HashedPassword, PasswordHasher};
use std::fmt;

use crate::error::AuthResult;

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input
///
/// Memory is zeroized when dropped.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Create a *new* password, enforcing the password policy
    ///
    /// ## Errors
    /// `AuthError::PasswordPolicy` with a user-facing message
    pub fn new(raw: String) -> AuthResult<Self> {
        Ok(Self(ClearTextPassword::new(raw)?))
    }

    /// Wrap input that is only compared against a stored hash
    pub fn for_verification(raw: String) -> Self {
        Self(ClearTextPassword::for_verification(raw))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Hashed credential for database storage (bcrypt modular crypt format)
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a raw password with a fresh salt
    pub fn from_raw(raw: &RawPassword, hasher: &PasswordHasher) -> AuthResult<Self> {
        Ok(Self(hasher.hash(raw.inner())?))
    }

    pub fn from_stored(hashed: HashedPassword) -> Self {
        Self(hashed)
    }

    /// Hash string for database storage
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Verify a raw password against this hash
    ///
    /// A malformed stored hash yields `Ok(false)`.
    pub fn verify(&self, raw: &RawPassword, hasher: &PasswordHasher) -> AuthResult<bool> {
        Ok(hasher.verify(raw.inner(), &self.0)?)
    }

    /// Whether the hash was produced with a different work factor than `hasher`
    pub fn needs_rehash(&self, hasher: &PasswordHasher) -> bool {
        hasher.needs_rehash(&self.0)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthError;

    fn hasher() -> PasswordHasher {
        PasswordHasher::with_cost(4).unwrap()
    }

    #[test]
    fn test_raw_password_validation() {
        assert!(RawPassword::new("ValidPass123!".to_string()).is_ok());
        assert!(matches!(
            RawPassword::new("12345".to_string()),
            Err(AuthError::PasswordPolicy(_))
        ));
        assert!(RawPassword::new(String::new()).is_err());
    }

    #[test]
    fn test_hash_and_verify() {
        let raw = RawPassword::new("TestPassword123!".to_string()).unwrap();
        let hashed = UserPassword::from_raw(&raw, &hasher()).unwrap();

        assert!(hashed.verify(&raw, &hasher()).unwrap());

        let wrong = RawPassword::for_verification("WrongPassword123!".to_string());
        assert!(!hashed.verify(&wrong, &hasher()).unwrap());
    }

    #[test]
    fn test_stored_hash_roundtrip() {
        let raw = RawPassword::new("TestPassword123!".to_string()).unwrap();
        let hashed = UserPassword::from_raw(&raw, &hasher()).unwrap();

        let restored = UserPassword::from_stored(HashedPassword::from_stored(hashed.as_str()));
        assert!(restored.verify(&raw, &hasher()).unwrap());
        assert!(!restored.needs_rehash(&hasher()));
    }

    #[test]
    fn test_debug_redaction() {
        let raw = RawPassword::new("SecretPassword123!".to_string()).unwrap();
        let debug = format!("{:?}", raw);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("Secret"));

        let hashed = UserPassword::from_raw(&raw, &hasher()).unwrap();
        assert!(format!("{:?}", hashed).contains("HASH"));
    }
}
