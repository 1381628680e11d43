//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{AUTH_REQUIRED_HEADER, require_admin, require_sign_in};
pub use router::{auth_router, auth_router_generic};
