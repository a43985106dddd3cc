//! Authentication repository traits

use async_trait::async_trait;
use std::collections::HashSet;

use super::entities::User;
use super::errors::AuthError;
use super::value_objects::{PasswordHash, UserId, UserRole};
use crate::domain::assessment::entities::ProjectAccess;
use crate::domain::assessment::value_objects::ProjectId;
use crate::domain::errors::DomainError;

/// Fields for creating a user account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: PasswordHash,
    pub role: UserRole,
    pub created_by: Option<UserId>,
}

/// Partial update for a user account; password changes go through
/// `update_password`
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

/// User repository trait for user persistence
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError>;

    async fn find_by_id(&self, user_id: UserId) -> Result<Option<User>, AuthError>;

    async fn create(&self, fields: NewUser) -> Result<User, AuthError>;

    /// All users in creation order
    async fn list(&self) -> Result<Vec<User>, AuthError>;

    async fn update(&self, user_id: UserId, patch: UserPatch) -> Result<User, AuthError>;

    async fn update_password(
        &self,
        user_id: UserId,
        password_hash: PasswordHash,
    ) -> Result<(), AuthError>;

    async fn delete(&self, user_id: UserId) -> Result<(), AuthError>;
}

/// Repository for (user, project) access grants
#[async_trait]
pub trait ProjectAccessRepository: Send + Sync {
    /// Ids of all projects the user holds a `has_access = true` grant for
    async fn granted_project_ids(&self, user_id: UserId)
    -> Result<HashSet<ProjectId>, DomainError>;

    /// Upsert a grant with `has_access = true`
    async fn grant(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        granted_by: UserId,
    ) -> Result<ProjectAccess, DomainError>;

    /// Set `has_access = false` on an existing grant; NotFound when no grant
    /// row exists for the pair
    async fn revoke(&self, user_id: UserId, project_id: ProjectId) -> Result<(), DomainError>;

    async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<ProjectAccess>, DomainError>;

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<ProjectAccess>, DomainError>;
}
