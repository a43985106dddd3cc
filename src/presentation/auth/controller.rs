//! Authentication controller endpoints

use axum::{Json, extract::State, http::StatusCode};

use crate::presentation::auth::extractors::AuthUser;
use crate::presentation::auth::models::{
    ChangePasswordRequest, LoginRequest, TokenResponse, UserResponse,
};
use crate::presentation::controllers::AppState;
use crate::presentation::error::ApiError;
use crate::presentation::models::ErrorResponse;

/// Login endpoint
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials or inactive account", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let result = state
        .login_use_case
        .execute(&request.username, request.password)
        .await?;

    let user = state
        .users
        .find_by_id(result.user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User not found"))?;

    Ok(Json(TokenResponse {
        access_token: result.access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.token_ttl_hours * 3600,
        user: user.into(),
    }))
}

/// Current user endpoint
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Authenticated user", body = UserResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(user.into())
}

/// Change own password endpoint
#[utoipa::path(
    post,
    path = "/api/v1/auth/change-password",
    tag = "auth",
    request_body = ChangePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 401, description = "Current password rejected", body = ErrorResponse),
        (status = 422, description = "New password too weak", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .change_password_use_case
        .execute(user.id, request.current_password, request.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
