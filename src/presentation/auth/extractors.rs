//! Authentication extractors for Axum

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use std::sync::Arc;

use crate::application::auth::use_cases::ValidateTokenUseCase;
use crate::domain::auth::entities::User;
use crate::domain::auth::repositories::UserRepository;

use crate::presentation::error::ApiError;

/// State for authentication extractors, injected into request extensions
#[derive(Clone)]
pub struct AuthState {
    pub validate_token: Arc<ValidateTokenUseCase>,
    pub user_repository: Arc<dyn UserRepository>,
}

/// Authenticated user extracted from a Bearer token.
///
/// The token's subject is re-resolved against the user store on every
/// request so deactivated or deleted accounts are rejected immediately,
/// not at token expiry.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = parts.extensions.get::<AuthState>().ok_or_else(|| {
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIGURATION_ERROR",
                "Auth state not found in request extensions",
            )
        })?;

        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

        let user_id = auth_state.validate_token.execute(token).map_err(ApiError::from)?;

        let user = auth_state
            .user_repository
            .find_by_id(user_id)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::unauthorized("User not found"))?;

        if !user.is_active {
            return Err(ApiError::unauthorized("Inactive user"));
        }

        Ok(AuthUser(user))
    }
}

/// Authenticated admin. Same as [`AuthUser`] but rejects non-admin roles
/// with 403.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            return Err(ApiError::forbidden("Admin access required"));
        }

        Ok(AdminUser(user))
    }
}
