//! Sign Up Use Case
//!
//! Registers a new storefront customer.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::required;
use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserStore;
use crate::domain::value_object::{
    email::Email,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Sign up input
///
/// Empty strings count as missing.
#[derive(Debug, Default)]
pub struct SignUpInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: String,
    /// Security answer for password reset
    pub answer: String,
}

/// Sign up use case
pub struct SignUpUseCase<S>
where
    S: UserStore,
{
    store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> SignUpUseCase<S>
where
    S: UserStore,
{
    pub fn new(store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self { store, config }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<User> {
        let name = required("Name", input.name)?;
        let email = required("Email", input.email)?;
        let password = required("Password", input.password)?;
        let phone = required("Phone", input.phone)?;
        let address = required("Address", input.address)?;
        let answer = required("Answer", input.answer)?;

        let email = Email::new(email)?;
        let raw_password = RawPassword::new(password)?;

        if self.store.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let hasher = &self.config.hasher;
        let password_hash = UserPassword::from_raw(&raw_password, hasher)?;
        let answer_hash = UserPassword::from_raw(&RawPassword::for_verification(answer), hasher)?;

        let user = User::new(NewUser {
            name,
            email,
            password_hash,
            phone,
            address,
            answer_hash,
        });

        // The store enforces uniqueness again for concurrent registrations
        self.store.create(&user).await?;

        tracing::info!(user_id = %user.user_id, "User signed up");

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_role::UserRole;
    use crate::infra::memory::InMemoryUserStore;
    use crate::test_support::{fast_hasher, test_config};

    fn input(email: &str) -> SignUpInput {
        SignUpInput {
            name: "Alice".into(),
            email: email.into(),
            password: "secret123".into(),
            phone: "555-0100".into(),
            address: "1 Main St".into(),
            answer: "football".into(),
        }
    }

    fn use_case(store: &InMemoryUserStore) -> SignUpUseCase<InMemoryUserStore> {
        SignUpUseCase::new(Arc::new(store.clone()), Arc::new(test_config()))
    }

    #[tokio::test]
    async fn test_sign_up_creates_ordinary_user() {
        let store = InMemoryUserStore::new();
        let user = use_case(&store).execute(input("Alice@Example.com")).await.unwrap();

        assert_eq!(user.role, UserRole::User);
        assert_eq!(user.email.as_str(), "alice@example.com");

        let stored = store.find_by_id(&user.user_id).await.unwrap().unwrap();
        let hasher = fast_hasher();
        assert!(
            stored
                .password_hash
                .verify(&RawPassword::for_verification("secret123".into()), &hasher)
                .unwrap()
        );
        assert!(
            stored
                .answer_hash
                .verify(&RawPassword::for_verification("football".into()), &hasher)
                .unwrap()
        );
        assert_ne!(stored.password_hash.as_str(), "secret123");
    }

    #[tokio::test]
    async fn test_missing_fields_reported_by_name() {
        let store = InMemoryUserStore::new();
        let cases = [
            ("Name", SignUpInput { name: String::new(), ..input("a@example.com") }),
            ("Email", SignUpInput { email: "  ".into(), ..input("a@example.com") }),
            ("Password", SignUpInput { password: String::new(), ..input("a@example.com") }),
            ("Phone", SignUpInput { phone: String::new(), ..input("a@example.com") }),
            ("Address", SignUpInput { address: String::new(), ..input("a@example.com") }),
            ("Answer", SignUpInput { answer: String::new(), ..input("a@example.com") }),
        ];

        for (field, input) in cases {
            let err = use_case(&store).execute(input).await.unwrap_err();
            assert!(matches!(err, AuthError::MissingField(f) if f == field), "{field}");
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_existing_email_rejected() {
        let store = InMemoryUserStore::new();
        use_case(&store).execute(input("dup@example.com")).await.unwrap();

        let err = use_case(&store).execute(input("DUP@example.com")).await.unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_weak_password_rejected() {
        let store = InMemoryUserStore::new();
        let err = use_case(&store)
            .execute(SignUpInput {
                password: "12345".into(),
                ..input("weak@example.com")
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::PasswordPolicy(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let store = InMemoryUserStore::new();
        let err = use_case(&store).execute(input("not-an-email")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidEmail(_)));
    }
}
