//! User Entity
//!
//! The storefront customer record. Credentials are kept only as hashes.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    email::Email, user_id::UserId, user_password::UserPassword, user_role::UserRole,
};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier (token subject)
    pub user_id: UserId,
    /// Display name
    pub name: String,
    /// Login identifier (unique, lowercase)
    pub email: Email,
    pub password_hash: UserPassword,
    pub phone: String,
    /// Shipping address
    pub address: String,
    /// Hashed security answer used for password reset
    pub answer_hash: UserPassword,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields collected at registration
#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub password_hash: UserPassword,
    pub phone: String,
    pub address: String,
    pub answer_hash: UserPassword,
}

impl User {
    /// Create a new ordinary user
    pub fn new(new_user: NewUser) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            phone: new_user.phone,
            address: new_user.address,
            answer_hash: new_user.answer_hash,
            role: UserRole::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Apply a partial update; unspecified fields stay unchanged
    pub fn apply(&mut self, changes: UserChanges) {
        if changes.is_empty() {
            return;
        }

        let UserChanges {
            name,
            password_hash,
            phone,
            address,
            role,
        } = changes;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(password_hash) = password_hash {
            self.password_hash = password_hash;
        }
        if let Some(phone) = phone {
            self.phone = phone;
        }
        if let Some(address) = address {
            self.address = address;
        }
        if let Some(role) = role {
            self.role = role;
        }
        self.updated_at = Utc::now();
    }
}

/// Partial update passed to `UserStore::update_by_id`
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub password_hash: Option<UserPassword>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: Option<UserRole>,
}

impl UserChanges {
    pub fn password(password_hash: UserPassword) -> Self {
        Self {
            password_hash: Some(password_hash),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.password_hash.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.role.is_none()
    }
}
