//! User ID Value Object
//!
//! UUID-backed identifier shared through the kernel. Serialized as the
//! token subject.

pub use kernel::id::UserId;
