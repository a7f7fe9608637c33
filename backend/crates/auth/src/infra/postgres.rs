//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_id::UserId, user_name::UserName};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_USER: &str = r#"
    SELECT
        user_id,
        username,
        email,
        full_name,
        password_hash,
        avatar_url,
        cover_image_url,
        refresh_token,
        created_at,
        updated_at
    FROM users
"#;

impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                username,
                email,
                full_name,
                password_hash,
                avatar_url,
                cover_image_url,
                refresh_token,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.full_name)
        .bind(user.password_hash.as_phc_string())
        .bind(&user.avatar_url)
        .bind(&user.cover_image_url)
        .bind(&user.refresh_token)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e.as_database_error().and_then(|db| db.code()) {
            // Unique violation: the store-level uniqueness backstop
            Some(code) if code == "23505" => AuthError::IdentifierTaken,
            _ => AuthError::Database(e),
        })?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let sql = format!("{SELECT_USER} WHERE user_id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_identifier(
        &self,
        email: Option<&Email>,
        username: Option<&UserName>,
    ) -> AuthResult<Option<User>> {
        let sql = format!(
            r#"{SELECT_USER}
            WHERE ($1::text IS NOT NULL AND email = $1)
               OR ($2::text IS NOT NULL AND username = $2)
            "#
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email.map(Email::as_str))
            .bind(username.map(UserName::as_str))
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn exists_by_identifier(&self, email: &Email, username: &UserName) -> AuthResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 OR username = $2)",
        )
        .bind(email.as_str())
        .bind(username.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn set_refresh_token(&self, user_id: &UserId, token: Option<&str>) -> AuthResult<()> {
        sqlx::query("UPDATE users SET refresh_token = $2, updated_at = now() WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn swap_refresh_token(
        &self,
        user_id: &UserId,
        current: &str,
        next: &str,
    ) -> AuthResult<bool> {
        // Conditional update: zero rows affected means the stored token
        // no longer matches, i.e. another rotation won the race
        let result = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token = $3, updated_at = now()
            WHERE user_id = $1 AND refresh_token = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(current)
        .bind(next)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

// ============================================================================
// Row Mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    username: String,
    email: String,
    full_name: String,
    password_hash: String,
    avatar_url: String,
    cover_image_url: Option<String>,
    refresh_token: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let password_hash = HashedPassword::from_phc_string(self.password_hash)
            .map_err(|e| AuthError::Internal(format!("Corrupt password hash in store: {e}")))?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            username: UserName::from_db(self.username),
            email: Email::from_db(self.email),
            full_name: self.full_name,
            password_hash,
            avatar_url: self.avatar_url,
            cover_image_url: self.cover_image_url,
            refresh_token: self.refresh_token,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
