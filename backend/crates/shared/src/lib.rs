//! Shared Kernel - vocabulary shared by every backend crate
//!
//! Only things with the same meaning everywhere live here:
//! - The unified [`error::app_error::AppError`] and its [`error::kind::ErrorKind`]
//! - Typed identifiers ([`id::Id`])
//!
//! The axum integration is feature-gated (`axum`).

pub mod error {
    pub mod app_error;
    #[cfg(feature = "axum")]
    pub mod conversions;
    pub mod kind;
}
pub mod id;
