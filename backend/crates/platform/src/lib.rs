//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations used by the auth module:
//! - Password hashing and verification (bcrypt, fixed work factor)
//! - Signed, time-limited identity tokens (HS256 JWT)
//! - A clock abstraction so token expiry can be simulated
//! - `Authorization` header parsing
//! - Random bytes / base64 helpers for secrets

pub mod clock;
pub mod crypto;
pub mod header;
pub mod password;
pub mod token;
