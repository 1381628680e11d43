//! In-Memory User Store
//!
//! Backs tests and local development. Supports injected latency and
//! failures so callers can exercise their timeout and fail-closed paths.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;

use crate::domain::entity::user::{User, UserChanges};
use crate::domain::repository::UserStore;
use crate::domain::value_object::{email::Email, user_id::UserId};
use crate::error::{AuthError, AuthResult};

#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    users: RwLock<HashMap<UserId, User>>,
    failing: AtomicBool,
    latency_ms: AtomicU64,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `StoreUnavailable`
    pub fn set_failing(&self, failing: bool) {
        self.inner.failing.store(failing, Ordering::SeqCst);
    }

    /// Delay every subsequent call by `latency`
    pub fn set_latency(&self, latency: Duration) {
        let millis = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.inner.latency_ms.store(millis, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.inner.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn before_call(&self) -> AuthResult<()> {
        let latency = self.inner.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        if self.inner.failing.load(Ordering::SeqCst) {
            return Err(AuthError::StoreUnavailable("injected failure".into()));
        }
        Ok(())
    }
}

impl UserStore for InMemoryUserStore {
    async fn create(&self, user: &User) -> AuthResult<()> {
        self.before_call().await?;

        let mut users = self.inner.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AuthError::EmailTaken);
        }
        users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        self.before_call().await?;

        let users = self.inner.users.read().await;
        Ok(users.values().find(|u| &u.email == email).cloned())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        self.before_call().await?;

        Ok(self.inner.users.read().await.get(user_id).cloned())
    }

    async fn update_by_id(&self, user_id: &UserId, changes: UserChanges) -> AuthResult<User> {
        self.before_call().await?;

        let mut users = self.inner.users.write().await;
        let user = users.get_mut(user_id).ok_or(AuthError::UserNotFound)?;
        user.apply(changes);
        Ok(user.clone())
    }
}
