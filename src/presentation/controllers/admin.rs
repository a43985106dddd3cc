//! Admin endpoints: user accounts and project access grants

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::domain::assessment::value_objects::ProjectId;
use crate::domain::auth::repositories::UserPatch;
use crate::domain::auth::value_objects::{UserId, UserRole};
use crate::presentation::auth::extractors::AdminUser;
use crate::presentation::auth::models::{
    CreateUserRequest, ResetPasswordRequest, UpdateUserRequest, UserResponse,
};
use crate::presentation::error::ApiError;
use crate::presentation::models::{ErrorResponse, GrantAccessRequest, ProjectAccessResponse};

use super::AppState;

// User management

#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    tag = "admin",
    responses(
        (status = 200, description = "All user accounts", body = [UserResponse]),
        (status = 403, description = "Admin access required", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/users",
    tag = "admin",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 409, description = "Username or email taken", body = ErrorResponse),
        (status = 422, description = "Weak password", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    if request.username.trim().is_empty() {
        return Err(ApiError::validation("username must not be empty"));
    }
    if !request.email.contains('@') {
        return Err(ApiError::validation("email is not valid"));
    }

    let user = state
        .create_user_use_case
        .execute(
            request.username,
            request.email,
            request.password,
            request.role.unwrap_or(UserRole::User),
            admin.id,
        )
        .await?;

    tracing::info!(user_id = %user.id, created_by = %admin.id, "user account created");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{user_id}",
    tag = "admin",
    params(("user_id" = i64, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(user_id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .users
        .update(
            UserId::new(user_id),
            UserPatch {
                email: request.email,
                role: request.role,
                is_active: request.is_active,
            },
        )
        .await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{user_id}",
    tag = "admin",
    params(("user_id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if admin.id.as_i64() == user_id {
        return Err(ApiError::validation("Cannot delete your own account"));
    }

    state.users.delete(UserId::new(user_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/users/{user_id}/reset-password",
    tag = "admin",
    params(("user_id" = i64, Path, description = "User id")),
    request_body = ResetPasswordRequest,
    responses(
        (status = 204, description = "Password reset"),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Weak password", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn reset_password(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(user_id): Path<i64>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .reset_password_use_case
        .execute(UserId::new(user_id), request.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// Project access grants

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct AccessListQuery {
    /// Filter grants by user
    pub user_id: Option<i64>,
    /// Filter grants by project
    pub project_id: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/project-access",
    tag = "admin",
    params(AccessListQuery),
    responses(
        (status = 200, description = "Access grants", body = [ProjectAccessResponse]),
        (status = 422, description = "Missing filter", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_project_access(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<AccessListQuery>,
) -> Result<Json<Vec<ProjectAccessResponse>>, ApiError> {
    let grants = match (query.user_id, query.project_id) {
        (Some(user_id), _) => state.project_access.list_for_user(UserId::new(user_id)).await?,
        (None, Some(project_id)) => {
            state
                .project_access
                .list_for_project(ProjectId::new(project_id))
                .await?
        }
        (None, None) => {
            return Err(ApiError::validation(
                "Provide user_id or project_id to filter grants",
            ));
        }
    };

    Ok(Json(grants.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/project-access",
    tag = "admin",
    request_body = GrantAccessRequest,
    responses(
        (status = 201, description = "Access granted", body = ProjectAccessResponse),
        (status = 404, description = "User or project not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn grant_project_access(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(request): Json<GrantAccessRequest>,
) -> Result<(StatusCode, Json<ProjectAccessResponse>), ApiError> {
    let user_id = UserId::new(request.user_id);
    let project_id = ProjectId::new(request.project_id);

    // The upsert relies on FK violations for missing rows; check the
    // project first for a precise 404 message.
    if !state.projects.exists(project_id).await? {
        return Err(ApiError::not_found(format!("Project not found: {project_id}")));
    }

    let grant = state
        .project_access
        .grant(user_id, project_id, admin.id)
        .await?;

    tracing::info!(
        user_id = %user_id,
        project_id = %project_id,
        granted_by = %admin.id,
        "project access granted"
    );
    Ok((StatusCode::CREATED, Json(grant.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/project-access",
    tag = "admin",
    request_body = GrantAccessRequest,
    responses(
        (status = 204, description = "Access revoked"),
        (status = 404, description = "Grant not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn revoke_project_access(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(request): Json<GrantAccessRequest>,
) -> Result<StatusCode, ApiError> {
    let user_id = UserId::new(request.user_id);
    let project_id = ProjectId::new(request.project_id);

    state.project_access.revoke(user_id, project_id).await?;

    tracing::info!(
        user_id = %user_id,
        project_id = %project_id,
        revoked_by = %admin.id,
        "project access revoked"
    );
    Ok(StatusCode::NO_CONTENT)
}
