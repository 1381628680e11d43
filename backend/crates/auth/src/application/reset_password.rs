//! Reset Password Use Case
//!
//! Replaces a forgotten password after checking the security answer.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::required;
use crate::domain::entity::user::UserChanges;
use crate::domain::repository::UserStore;
use crate::domain::value_object::{
    email::Email,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Default)]
pub struct ResetPasswordInput {
    pub email: String,
    pub answer: String,
    pub new_password: String,
}

pub struct ResetPasswordUseCase<S>
where
    S: UserStore,
{
    store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> ResetPasswordUseCase<S>
where
    S: UserStore,
{
    pub fn new(store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self { store, config }
    }

    pub async fn execute(&self, input: ResetPasswordInput) -> AuthResult<()> {
        let email = required("Email", input.email)?;
        let answer = required("Answer", input.answer)?;
        let new_password = required("New password", input.new_password)?;

        let new_password = RawPassword::new(new_password)?;
        let email = Email::new(email).map_err(|_| AuthError::InvalidResetAnswer)?;

        let user = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidResetAnswer)?;

        let hasher = &self.config.hasher;
        if !user
            .answer_hash
            .verify(&RawPassword::for_verification(answer), hasher)?
        {
            return Err(AuthError::InvalidResetAnswer);
        }

        let password_hash = UserPassword::from_raw(&new_password, hasher)?;
        self.store
            .update_by_id(&user.user_id, UserChanges::password(password_hash))
            .await?;

        tracing::info!(user_id = %user.user_id, "Password reset");

        Ok(())
    }
}
