//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod gate;
pub mod reset_password;
pub mod sign_in;
pub mod sign_up;
pub mod update_profile;

// Re-exports
pub use config::{AuthConfig, ConfigError};
pub use gate::{AuthGate, GateOutcome, Rejection, RequestContext, Stage};
pub use reset_password::{ResetPasswordInput, ResetPasswordUseCase};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_up::{SignUpInput, SignUpUseCase};
pub use update_profile::{UpdateProfileInput, UpdateProfileUseCase};

use crate::error::{AuthError, AuthResult};

/// Reject blank input as `MissingField(field)`
pub(crate) fn required(field: &'static str, value: String) -> AuthResult<String> {
    if value.trim().is_empty() {
        return Err(AuthError::MissingField(field));
    }
    Ok(value)
}
