//! Shared test fixtures

use std::sync::Arc;

use platform::clock::{Clock, ManualClock};
use platform::password::{HashedPassword, PasswordHasher};
use platform::token::{MIN_SECRET_LEN, SigningSecret};

use crate::application::config::AuthConfig;
use crate::domain::entity::user::{NewUser, User};
use crate::domain::value_object::{
    email::Email,
    user_password::{RawPassword, UserPassword},
    user_role::UserRole,
};

pub const PASSWORD: &str = "secret123";
pub const ANSWER: &str = "football";

pub fn fast_hasher() -> PasswordHasher {
    PasswordHasher::with_cost(4).unwrap()
}

/// Config with a fixed secret and the cheapest bcrypt cost
pub fn test_config() -> AuthConfig {
    AuthConfig::new(SigningSecret::new(vec![42; MIN_SECRET_LEN]).unwrap()).with_hasher(fast_hasher())
}

pub fn manual_clock() -> (Arc<ManualClock>, Arc<dyn Clock>) {
    let clock = Arc::new(ManualClock::starting_now());
    let dyn_clock: Arc<dyn Clock> = clock.clone();
    (clock, dyn_clock)
}

/// User whose stored hashes are placeholders (never verify)
pub fn sample_user(email: &str, role: UserRole) -> User {
    let placeholder = || UserPassword::from_stored(HashedPassword::from_stored("$2b$04$placeholder"));
    let mut user = User::new(NewUser {
        name: "Test User".into(),
        email: Email::new(email).unwrap(),
        password_hash: placeholder(),
        phone: "555-0100".into(),
        address: "1 Main St".into(),
        answer_hash: placeholder(),
    });
    user.role = role;
    user
}

/// User with real hashes of [`PASSWORD`] and [`ANSWER`]
pub fn registered_user(email: &str, role: UserRole) -> User {
    let hasher = fast_hasher();
    let mut user = sample_user(email, role);
    user.password_hash =
        UserPassword::from_raw(&RawPassword::for_verification(PASSWORD.into()), &hasher).unwrap();
    user.answer_hash =
        UserPassword::from_raw(&RawPassword::for_verification(ANSWER.into()), &hasher).unwrap();
    user
}
