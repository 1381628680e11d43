//! Repository Traits
//!
//! Identity Store interface. Implementations live in the infrastructure layer.

use crate::domain::entity::user::{User, UserChanges};
use crate::domain::value_object::{email::Email, user_id::UserId};
use crate::error::AuthResult;

/// User record store
#[trait_variant::make(UserStore: Send)]
pub trait LocalUserStore {
    /// Insert a new user
    ///
    /// Fails with `AuthError::EmailTaken` if the email is already registered.
    async fn create(&self, user: &User) -> AuthResult<()>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Apply `changes` and return the updated record
    ///
    /// Fails with `AuthError::UserNotFound` if no record matches.
    async fn update_by_id(&self, user_id: &UserId, changes: UserChanges) -> AuthResult<User>;
}
