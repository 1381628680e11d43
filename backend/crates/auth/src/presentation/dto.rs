//! API DTOs (Data Transfer Objects)
//!
//! Missing request fields deserialize as empty and are reported by the use
//! cases with a field-specific message.

use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;
use crate::domain::value_object::user_id::UserId;

// ============================================================================
// Register
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub success: bool,
    pub message: &'static str,
    pub user: UserView,
}

// ============================================================================
// Login
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub message: &'static str,
    pub user: UserView,
    pub token: String,
}

// ============================================================================
// Forgot Password
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub email: String,
    pub answer: String,
    pub new_password: String,
}

// ============================================================================
// Profile
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileResponse {
    pub success: bool,
    pub message: &'static str,
    pub updated_user: UserView,
}

// ============================================================================
// Shared
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

/// Access check result for the client's route guards
#[derive(Debug, Clone, Serialize)]
pub struct AccessResponse {
    pub ok: bool,
}

/// Public view of a user (no credential hashes)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// 0 = user, 1 = admin
    pub role: i16,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.user_id,
            name: user.name,
            email: user.email.into(),
            phone: user.phone,
            address: user.address,
            role: user.role.id(),
        }
    }
}
