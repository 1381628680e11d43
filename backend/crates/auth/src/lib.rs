//! Auth (Authentication & Authorization) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - User entity, value objects, store trait
//! - `application/` - Auth gate, account use cases, configuration
//! - `infra/` - PostgreSQL and in-memory user stores
//! - `presentation/` - HTTP handlers, DTOs, middleware, router
//!
//! ## Features
//! - Registration with a hashed security answer for password reset
//! - Email + password sign-in issuing a stateless identity token
//! - `require_sign_in` / `require_admin` middleware over the auth gate
//! - Role-based access (User, Admin), re-read from the store on every check
//!
//! ## Security Model
//! - Credentials hashed with bcrypt (cost 10 by default)
//! - HS256 identity tokens with a 7 day lifetime, no revocation
//! - The gate fails closed: store errors and timeouts deny access

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod test_support;

// Re-exports for convenience
pub use application::config::{AuthConfig, ConfigError};
pub use error::{AuthError, AuthResult};
pub use infra::{memory::InMemoryUserStore, postgres::PgUserStore};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod gate {
    pub use crate::application::gate::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
