//! PostgreSQL User Store

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::user::{User, UserChanges};
use crate::domain::repository::UserStore;
use crate::domain::value_object::{
    email::Email, user_id::UserId, user_password::UserPassword, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

const USER_COLUMNS: &str = r#"
    user_id,
    name,
    email,
    password_hash,
    phone,
    address,
    answer_hash,
    role,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed user store
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserStore for PgUserStore {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                name,
                email,
                password_hash,
                phone,
                address,
                answer_hash,
                role,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(&user.name)
        .bind(user.email.as_str())
        .bind(user.password_hash.as_str())
        .bind(&user.phone)
        .bind(&user.address)
        .bind(user.answer_hash.as_str())
        .bind(user.role.id())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AuthError::EmailTaken)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn update_by_id(&self, user_id: &UserId, changes: UserChanges) -> AuthResult<User> {
        // NULL parameters keep the current column value
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                password_hash = COALESCE($3, password_hash),
                phone = COALESCE($4, phone),
                address = COALESCE($5, address),
                role = COALESCE($6, role),
                updated_at = CASE WHEN $7 THEN now() ELSE updated_at END
            WHERE user_id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id.as_uuid())
        .bind(changes.name.as_deref())
        .bind(changes.password_hash.as_ref().map(UserPassword::as_str))
        .bind(changes.phone.as_deref())
        .bind(changes.address.as_deref())
        .bind(changes.role.map(|r| r.id()))
        .bind(!changes.is_empty())
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(AuthError::UserNotFound)?.into_user()
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    phone: String,
    address: String,
    answer_hash: String,
    role: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let email = Email::new(&self.email)
            .map_err(|e| AuthError::CorruptRecord(format!("email of {}: {e}", self.user_id)))?;
        let role = UserRole::try_from(self.role)
            .map_err(|e| AuthError::CorruptRecord(format!("role of {}: {e}", self.user_id)))?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            name: self.name,
            email,
            password_hash: UserPassword::from_stored(HashedPassword::from_stored(self.password_hash)),
            phone: self.phone,
            address: self.address,
            answer_hash: UserPassword::from_stored(HashedPassword::from_stored(self.answer_hash)),
            role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(role: i16, email: &str) -> UserRow {
        let now = Utc::now();
        UserRow {
            user_id: Uuid::new_v4(),
            name: "Ivy".into(),
            email: email.into(),
            password_hash: "$2b$10$hash".into(),
            phone: "555-0100".into(),
            address: "1 Main St".into(),
            answer_hash: "$2b$10$answer".into(),
            role,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_row_maps_to_user() {
        let user = row(1, "ivy@example.com").into_user().unwrap();
        assert_eq!(user.role, UserRole::Admin);
        assert_eq!(user.email.as_str(), "ivy@example.com");
        assert_eq!(user.password_hash.as_str(), "$2b$10$hash");
    }

    #[test]
    fn test_unknown_role_is_corrupt_record() {
        assert!(matches!(
            row(7, "ivy@example.com").into_user(),
            Err(AuthError::CorruptRecord(_))
        ));
    }

    #[test]
    fn test_invalid_email_is_corrupt_record() {
        assert!(matches!(
            row(0, "not-an-email").into_user(),
            Err(AuthError::CorruptRecord(_))
        ));
    }
}
