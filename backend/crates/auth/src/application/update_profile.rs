//! Update Profile Use Case
//!
//! Lets a signed-in user change their own name, password, phone or address.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::{
    principal::Principal,
    user::{User, UserChanges},
};
use crate::domain::repository::UserStore;
use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::AuthResult;

/// Unset or blank fields are left unchanged
#[derive(Debug, Default)]
pub struct UpdateProfileInput {
    pub name: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

pub struct UpdateProfileUseCase<S>
where
    S: UserStore,
{
    store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> UpdateProfileUseCase<S>
where
    S: UserStore,
{
    pub fn new(store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self { store, config }
    }

    pub async fn execute(&self, principal: &Principal, input: UpdateProfileInput) -> AuthResult<User> {
        let password_hash = match non_blank(input.password) {
            Some(password) => {
                let raw = RawPassword::new(password)?;
                Some(UserPassword::from_raw(&raw, &self.config.hasher)?)
            }
            None => None,
        };

        let changes = UserChanges {
            name: non_blank(input.name),
            password_hash,
            phone: non_blank(input.phone),
            address: non_blank(input.address),
            role: None,
        };

        let user = self.store.update_by_id(&principal.user_id, changes).await?;

        tracing::info!(user_id = %user.user_id, "Profile updated");

        Ok(user)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{user_id::UserId, user_role::UserRole};
    use crate::error::AuthError;
    use crate::infra::memory::InMemoryUserStore;
    use crate::test_support::{PASSWORD, fast_hasher, registered_user, test_config};

    fn use_case(store: &InMemoryUserStore) -> UpdateProfileUseCase<InMemoryUserStore> {
        UpdateProfileUseCase::new(Arc::new(store.clone()), Arc::new(test_config()))
    }

    async fn seeded() -> (InMemoryUserStore, User) {
        let store = InMemoryUserStore::new();
        let user = registered_user("hank@example.com", UserRole::User);
        store.create(&user).await.unwrap();
        (store, user)
    }

    #[tokio::test]
    async fn test_partial_update() {
        let (store, user) = seeded().await;
        let updated = use_case(&store)
            .execute(
                &Principal::new(user.user_id),
                UpdateProfileInput {
                    address: Some("9 Harbor Rd".into()),
                    name: Some("   ".into()),
                    ..UpdateProfileInput::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.address, "9 Harbor Rd");
        assert_eq!(updated.name, user.name);
        assert_eq!(updated.phone, user.phone);
        assert_eq!(updated.role, UserRole::User);
    }

    #[tokio::test]
    async fn test_password_change() {
        let (store, user) = seeded().await;
        let updated = use_case(&store)
            .execute(
                &Principal::new(user.user_id),
                UpdateProfileInput {
                    password: Some("changed-pass".into()),
                    ..UpdateProfileInput::default()
                },
            )
            .await
            .unwrap();

        let hasher = fast_hasher();
        let check = |pw: &str| {
            updated
                .password_hash
                .verify(&RawPassword::for_verification(pw.into()), &hasher)
                .unwrap()
        };
        assert!(check("changed-pass"));
        assert!(!check(PASSWORD));
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let (store, user) = seeded().await;
        let err = use_case(&store)
            .execute(
                &Principal::new(user.user_id),
                UpdateProfileInput {
                    password: Some("12345".into()),
                    ..UpdateProfileInput::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::PasswordPolicy(_)));
    }

    #[tokio::test]
    async fn test_unknown_principal() {
        let (store, _) = seeded().await;
        let err = use_case(&store)
            .execute(&Principal::new(UserId::new()), UpdateProfileInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }
}
