use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum UserRole {
    #[default]
    User = 0,
    Admin = 1,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserRoleError {
    #[error("Unknown role id: {0}")]
    UnknownId(i16),
}

impl UserRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl TryFrom<i16> for UserRole {
    type Error = UserRoleError;

    fn try_from(id: i16) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(UserRole::User),
            1 => Ok(UserRole::Admin),
            _ => Err(UserRoleError::UnknownId(id)),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_from_id() {
        assert_eq!(UserRole::try_from(0), Ok(UserRole::User));
        assert_eq!(UserRole::try_from(1), Ok(UserRole::Admin));
        assert_eq!(UserRole::try_from(2), Err(UserRoleError::UnknownId(2)));
        assert_eq!(UserRole::try_from(-1), Err(UserRoleError::UnknownId(-1)));
    }

    #[test]
    fn test_user_role_id_matches_storage() {
        assert_eq!(UserRole::User.id(), 0);
        assert_eq!(UserRole::Admin.id(), 1);
    }

    #[test]
    fn test_user_role_display() {
        assert_eq!(UserRole::User.to_string(), "user");
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }

    #[test]
    fn test_default_is_ordinary_user() {
        assert_eq!(UserRole::default(), UserRole::User);
        assert!(!UserRole::User.is_admin());
        assert!(UserRole::Admin.is_admin());
    }
}
