//! Request Principal
//!
//! The authenticated identity attached to a request once its token has been
//! verified. Lives only as long as the request.

use crate::domain::value_object::user_id::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
}

impl Principal {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}
