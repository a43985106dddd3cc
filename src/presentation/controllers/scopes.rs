//! Assessment scope endpoints

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::domain::assessment::repositories::{NewScope, ScopePatch};
use crate::domain::assessment::value_objects::ProjectId;
use crate::presentation::auth::extractors::AuthUser;
use crate::presentation::error::ApiError;
use crate::presentation::models::{
    CreateScopeRequest, ErrorResponse, ScopeResponse, UpdateScopeRequest,
};

use super::AppState;

/// List a project's scope entries
#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}/scopes",
    tag = "scopes",
    params(("project_id" = i64, Path, description = "Project id")),
    responses(
        (status = 200, description = "Scope entries in creation order", body = [ScopeResponse])
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_scopes(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(project_id): Path<i64>,
) -> Result<Json<Vec<ScopeResponse>>, ApiError> {
    let project_id = ProjectId::new(project_id);
    state.authorize(&user, project_id).await?;

    let scopes = state.scopes.list_for_project(project_id).await?;
    Ok(Json(scopes.into_iter().map(Into::into).collect()))
}

/// Add a scope entry to a project
#[utoipa::path(
    post,
    path = "/api/v1/projects/{project_id}/scopes",
    tag = "scopes",
    params(("project_id" = i64, Path, description = "Project id")),
    request_body = CreateScopeRequest,
    responses(
        (status = 201, description = "Scope entry created", body = ScopeResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_scope(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(project_id): Path<i64>,
    Json(request): Json<CreateScopeRequest>,
) -> Result<(StatusCode, Json<ScopeResponse>), ApiError> {
    let project_id = ProjectId::new(project_id);
    state.authorize(&user, project_id).await?;

    let scope = state
        .scopes
        .create(
            project_id,
            NewScope {
                subject: request.subject,
                info: request.info,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(scope.into())))
}

/// Update a scope entry
#[utoipa::path(
    put,
    path = "/api/v1/scopes/{scope_id}",
    tag = "scopes",
    params(("scope_id" = i64, Path, description = "Scope entry id")),
    request_body = UpdateScopeRequest,
    responses(
        (status = 200, description = "Scope entry updated", body = ScopeResponse),
        (status = 404, description = "Scope entry not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_scope(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(scope_id): Path<i64>,
    Json(request): Json<UpdateScopeRequest>,
) -> Result<Json<ScopeResponse>, ApiError> {
    let existing = state
        .scopes
        .find_by_id(scope_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Scope entry not found: {scope_id}")))?;
    state.authorize(&user, existing.project_id).await?;

    let scope = state
        .scopes
        .update(
            scope_id,
            ScopePatch {
                subject: request.subject,
                info: request.info,
            },
        )
        .await?;
    Ok(Json(scope.into()))
}

/// Delete a scope entry
#[utoipa::path(
    delete,
    path = "/api/v1/scopes/{scope_id}",
    tag = "scopes",
    params(("scope_id" = i64, Path, description = "Scope entry id")),
    responses(
        (status = 204, description = "Scope entry deleted"),
        (status = 404, description = "Scope entry not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_scope(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(scope_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let existing = state
        .scopes
        .find_by_id(scope_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Scope entry not found: {scope_id}")))?;
    state.authorize(&user, existing.project_id).await?;

    state.scopes.delete(scope_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
