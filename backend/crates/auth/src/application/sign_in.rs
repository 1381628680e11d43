//! Sign In Use Case
//!
//! Verifies email + password and issues an identity token.

use std::sync::Arc;

use platform::token::TokenService;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::{User, UserChanges};
use crate::domain::repository::UserStore;
use crate::domain::value_object::{
    email::Email,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Sign in input
#[derive(Debug, Default)]
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    /// Identity token for the `Authorization` header
    pub token: String,
    pub user: User,
}

/// Sign in use case
pub struct SignInUseCase<S>
where
    S: UserStore,
{
    store: Arc<S>,
    tokens: Arc<TokenService>,
    config: Arc<AuthConfig>,
}

impl<S> SignInUseCase<S>
where
    S: UserStore,
{
    pub fn new(store: Arc<S>, tokens: Arc<TokenService>, config: Arc<AuthConfig>) -> Self {
        Self {
            store,
            tokens,
            config,
        }
    }

    /// Unknown email, wrong password and missing fields are all
    /// `InvalidCredentials` so accounts cannot be enumerated.
    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        if input.email.trim().is_empty() || input.password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;
        let mut user = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let raw_password = RawPassword::for_verification(input.password);
        let hasher = &self.config.hasher;
        if !user.password_hash.verify(&raw_password, hasher)? {
            return Err(AuthError::InvalidCredentials);
        }

        if user.password_hash.needs_rehash(hasher) {
            user = self.rehash(user, &raw_password).await;
        }

        let token = self.tokens.issue(&user.user_id.to_string())?;

        tracing::info!(user_id = %user.user_id, "User signed in");

        Ok(SignInOutput { token, user })
    }

    /// Upgrade a hash made with an outdated cost. Best effort: sign-in
    /// succeeds even if the upgrade fails.
    async fn rehash(&self, user: User, raw_password: &RawPassword) -> User {
        let upgraded = match UserPassword::from_raw(raw_password, &self.config.hasher) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::warn!(user_id = %user.user_id, error = %e, "Password rehash failed");
                return user;
            }
        };

        match self
            .store
            .update_by_id(&user.user_id, UserChanges::password(upgraded))
            .await
        {
            Ok(updated) => {
                tracing::info!(user_id = %user.user_id, "Password hash upgraded");
                updated
            }
            Err(e) => {
                tracing::warn!(user_id = %user.user_id, error = %e, "Password rehash not stored");
                user
            }
        }
    }
}
