//! Authentication domain entities

use chrono::{DateTime, Utc};

use super::value_objects::{PasswordHash, UserId, UserRole};

/// User aggregate root
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// Hashed password (never expose raw hash)
    pub password_hash: PasswordHash,
    pub role: UserRole,
    /// Inactive accounts cannot authenticate
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    /// Id of the admin who created this account; resolved by explicit
    /// lookup, not an in-memory back-reference
    pub created_by: Option<UserId>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
