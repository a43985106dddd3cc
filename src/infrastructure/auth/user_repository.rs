//! SQLx implementation of the user repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::str::FromStr;

use crate::domain::auth::{
    entities::User,
    errors::AuthError,
    repositories::{NewUser, UserPatch, UserRepository},
    value_objects::{PasswordHash, UserId, UserRole},
};

/// SQLx implementation of the user repository
pub struct SqlxUserRepository {
    pool: PgPool,
}

impl SqlxUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    created_by: Option<i64>,
}

impl UserRow {
    fn into_entity(self) -> Result<User, AuthError> {
        let role = UserRole::from_str(&self.role).map_err(|e| AuthError::DatabaseError {
            message: format!("Corrupt role column for user {}: {e}", self.id),
        })?;
        Ok(User {
            id: UserId::from(self.id),
            username: self.username,
            email: self.email,
            password_hash: PasswordHash::from(self.password_hash),
            role,
            is_active: self.is_active,
            created_at: self.created_at,
            created_by: self.created_by.map(UserId::from),
        })
    }
}

fn db_error(e: sqlx::Error) -> AuthError {
    tracing::error!("User store error: {}", e);
    AuthError::DatabaseError {
        message: e.to_string(),
    }
}

const USER_COLUMNS: &str =
    "id, username, email, password_hash, role, is_active, created_at, created_by";

#[async_trait]
impl UserRepository for SqlxUserRepository {
    #[tracing::instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(UserRow::into_entity).transpose()
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    async fn find_by_id(&self, user_id: UserId) -> Result<Option<User>, AuthError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(UserRow::into_entity).transpose()
    }

    #[tracing::instrument(skip(self, fields), fields(username = %fields.username))]
    async fn create(&self, fields: NewUser) -> Result<User, AuthError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (username, email, password_hash, role, created_by) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        ))
        .bind(&fields.username)
        .bind(&fields.email)
        .bind(fields.password_hash.as_str())
        .bind(fields.role.as_str())
        .bind(fields.created_by.map(|id| id.as_i64()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return match db_err.constraint() {
                    Some("users_email_key") => AuthError::EmailAlreadyExists {
                        email: fields.email.clone(),
                    },
                    _ => AuthError::UsernameAlreadyExists {
                        username: fields.username.clone(),
                    },
                };
            }
            db_error(e)
        })?;

        row.into_entity()
    }

    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<User>, AuthError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(UserRow::into_entity).collect()
    }

    #[tracing::instrument(skip(self, patch), fields(user_id = %user_id))]
    async fn update(&self, user_id: UserId, patch: UserPatch) -> Result<User, AuthError> {
        let existing = self
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound {
                user_id: user_id.as_i64(),
            })?;

        let email = patch.email.unwrap_or(existing.email);
        let role = patch.role.unwrap_or(existing.role);
        let is_active = patch.is_active.unwrap_or(existing.is_active);

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET email = $2, role = $3, is_active = $4 \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(user_id.as_i64())
        .bind(&email)
        .bind(role.as_str())
        .bind(is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AuthError::EmailAlreadyExists { email: email.clone() };
            }
            db_error(e)
        })?;

        row.into_entity()
    }

    #[tracing::instrument(skip(self, password_hash), fields(user_id = %user_id))]
    async fn update_password(
        &self,
        user_id: UserId,
        password_hash: PasswordHash,
    ) -> Result<(), AuthError> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(user_id.as_i64())
            .bind(password_hash.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(AuthError::UserNotFound {
                user_id: user_id.as_i64(),
            });
        }
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    async fn delete(&self, user_id: UserId) -> Result<(), AuthError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(AuthError::UserNotFound {
                user_id: user_id.as_i64(),
            });
        }
        Ok(())
    }
}
