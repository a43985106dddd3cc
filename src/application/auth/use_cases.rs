//! Authentication use cases

use std::sync::Arc;

use crate::domain::auth::{
    entities::User,
    errors::AuthError,
    repositories::{NewUser, UserRepository},
    value_objects::{UserId, UserRole},
};
use crate::infrastructure::auth::{JwtService, PasswordHasher};

/// Result type for login operations
pub struct LoginResult {
    pub access_token: String,
    pub user_id: UserId,
    pub username: String,
    pub role: UserRole,
}

/// Use case for user login
pub struct LoginUseCase {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<PasswordHasher>,
    jwt_service: Arc<JwtService>,
}

impl LoginUseCase {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<PasswordHasher>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            jwt_service,
        }
    }

    pub async fn execute(&self, username: &str, password: String) -> Result<LoginResult, AuthError> {
        let user = self
            .user_repository
            .find_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let is_valid = self
            .password_hasher
            .verify(password, user.password_hash.clone())
            .await
            .map_err(|_| AuthError::InvalidCredentials)?;

        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        // Inactive accounts keep their grants but cannot authenticate
        if !user.is_active {
            return Err(AuthError::InactiveUser);
        }

        let access_token =
            self.jwt_service
                .generate_access_token(user.id, user.username.clone(), user.role)?;

        Ok(LoginResult {
            access_token,
            user_id: user.id,
            username: user.username,
            role: user.role,
        })
    }
}

/// Use case for validating JWT tokens
pub struct ValidateTokenUseCase {
    jwt_service: Arc<JwtService>,
}

impl ValidateTokenUseCase {
    pub fn new(jwt_service: Arc<JwtService>) -> Self {
        Self { jwt_service }
    }

    pub fn execute(&self, token: &str) -> Result<UserId, AuthError> {
        let claims = self.jwt_service.validate_token(token)?;
        claims.user_id().map_err(|_| AuthError::InvalidToken)
    }
}

/// Use case for creating user accounts (admin operation)
pub struct CreateUserUseCase {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<PasswordHasher>,
}

impl CreateUserUseCase {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<PasswordHasher>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
        }
    }

    pub async fn execute(
        &self,
        username: String,
        email: String,
        password: String,
        role: UserRole,
        created_by: UserId,
    ) -> Result<User, AuthError> {
        if password.len() < 8 {
            return Err(AuthError::WeakPassword);
        }

        let password_hash = self.password_hasher.hash(password).await?;

        self.user_repository
            .create(NewUser {
                username,
                email,
                password_hash,
                role,
                created_by: Some(created_by),
            })
            .await
    }
}

/// Use case for a user changing their own password
pub struct ChangePasswordUseCase {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<PasswordHasher>,
}

impl ChangePasswordUseCase {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<PasswordHasher>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
        }
    }

    pub async fn execute(
        &self,
        user_id: UserId,
        current_password: String,
        new_password: String,
    ) -> Result<(), AuthError> {
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound {
                user_id: user_id.as_i64(),
            })?;

        let is_valid = self
            .password_hasher
            .verify(current_password, user.password_hash.clone())
            .await?;
        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        if new_password.len() < 8 {
            return Err(AuthError::WeakPassword);
        }

        let password_hash = self.password_hasher.hash(new_password).await?;
        self.user_repository
            .update_password(user_id, password_hash)
            .await
    }
}

/// Use case for an admin resetting another user's password
pub struct ResetPasswordUseCase {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<PasswordHasher>,
}

impl ResetPasswordUseCase {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<PasswordHasher>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
        }
    }

    pub async fn execute(&self, user_id: UserId, new_password: String) -> Result<(), AuthError> {
        if new_password.len() < 8 {
            return Err(AuthError::WeakPassword);
        }

        // Confirm the account exists before hashing
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound {
                user_id: user_id.as_i64(),
            })?;

        let password_hash = self.password_hasher.hash(new_password).await?;
        self.user_repository
            .update_password(user_id, password_hash)
            .await
    }
}
