//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::{HashingError, PasswordPolicyError};
use platform::token::TokenError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Request lacks a valid identity token
    #[error("Authentication required")]
    Unauthenticated,

    /// Unknown email or wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Unknown email or wrong security answer
    #[error("Wrong email or answer")]
    InvalidResetAnswer,

    #[error("Already registered, please login")]
    EmailTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid email: {0}")]
    InvalidEmail(&'static str),

    #[error("{0}")]
    PasswordPolicy(#[from] PasswordPolicyError),

    /// Hashing primitive failure
    #[error("Credential hashing failed")]
    Hashing(#[from] HashingError),

    /// Token could not be issued
    #[error("Token issuance failed")]
    Token(#[from] TokenError),

    /// Stored data that cannot be mapped back to the domain
    #[error("Corrupted user record: {0}")]
    CorruptRecord(String),

    /// Identity store did not answer in time
    #[error("User store timed out")]
    StoreTimeout,

    /// Identity store unavailable (non-database stores)
    #[error("User store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Unauthenticated | AuthError::InvalidCredentials => ErrorKind::Unauthorized,
            AuthError::InvalidResetAnswer | AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::MissingField(_)
            | AuthError::InvalidEmail(_)
            | AuthError::PasswordPolicy(_) => ErrorKind::BadRequest,
            AuthError::StoreTimeout | AuthError::StoreUnavailable(_) => {
                ErrorKind::ServiceUnavailable
            }
            AuthError::Hashing(_)
            | AuthError::Token(_)
            | AuthError::CorruptRecord(_)
            | AuthError::Database(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Server-side failures get a generic message so internals never reach
    /// the client.
    pub fn to_app_error(&self) -> AppError {
        let kind = self.kind();
        if kind.is_server_error() {
            return AppError::new(kind, kind.as_str());
        }

        let err = AppError::new(kind, self.to_string());
        match self {
            AuthError::EmailTaken => err.with_action("Sign in with this email instead"),
            AuthError::PasswordPolicy(_) => err.with_action("Please choose a different password"),
            _ => err,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Hashing(e) => {
                tracing::error!(error = %e, "Credential hashing failed");
            }
            AuthError::Token(e) => {
                tracing::error!(error = %e, "Token issuance failed");
            }
            AuthError::CorruptRecord(msg) => {
                tracing::error!(message = %msg, "Corrupted user record");
            }
            AuthError::StoreTimeout | AuthError::StoreUnavailable(_) => {
                tracing::error!(error = %self, "User store unavailable");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidResetAnswer => {
                tracing::warn!("Invalid password reset attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => AuthError::StoreTimeout,
            other => AuthError::Database(other),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
