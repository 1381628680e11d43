//! Email Value Object
//!
//! Login identifier. Trimmed and lowercased so lookups are case-insensitive;
//! format checks are deliberately shallow.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AuthError, AuthResult};

/// Maximum email length (RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;
const LOCAL_PART_MAX_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn new(email: impl AsRef<str>) -> AuthResult<Self> {
        let email = email.as_ref().trim().to_lowercase();

        if email.is_empty() {
            return Err(AuthError::MissingField("Email"));
        }
        if email.len() > EMAIL_MAX_LENGTH {
            return Err(AuthError::InvalidEmail("too long"));
        }

        let (local, domain) = email
            .split_once('@')
            .ok_or(AuthError::InvalidEmail("missing @"))?;

        if local.is_empty() || local.len() > LOCAL_PART_MAX_LENGTH || local.contains(char::is_whitespace) {
            return Err(AuthError::InvalidEmail("bad local part"));
        }
        if !Self::is_valid_domain(domain) {
            return Err(AuthError::InvalidEmail("bad domain"));
        }

        Ok(Self(email))
    }

    fn is_valid_domain(domain: &str) -> bool {
        !domain.is_empty()
            && domain.contains('.')
            && domain
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
            && !domain.starts_with(['.', '-'])
            && !domain.ends_with(['.', '-'])
            && !domain.contains("..")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Email {
    type Err = AuthError;

    fn from_str(s: &str) -> AuthResult<Self> {
        Email::new(s)
    }
}

impl TryFrom<String> for Email {
    type Error = AuthError;

    fn try_from(s: String) -> AuthResult<Self> {
        Email::new(s)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
