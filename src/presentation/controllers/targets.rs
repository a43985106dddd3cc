//! Assessment target endpoints

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::domain::assessment::value_objects::{ProjectId, TargetId};
use crate::presentation::auth::extractors::AuthUser;
use crate::presentation::error::ApiError;
use crate::presentation::models::{CreateTargetRequest, ErrorResponse, TargetResponse};

use super::AppState;

/// List a project's assessment targets
#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}/targets",
    tag = "targets",
    params(("project_id" = i64, Path, description = "Project id")),
    responses(
        (status = 200, description = "Targets in creation order", body = [TargetResponse])
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_targets(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(project_id): Path<i64>,
) -> Result<Json<Vec<TargetResponse>>, ApiError> {
    let project_id = ProjectId::new(project_id);
    state.authorize(&user, project_id).await?;

    let targets = state.targets.list_for_project(project_id).await?;
    Ok(Json(targets.into_iter().map(Into::into).collect()))
}

/// Add a target to a project
#[utoipa::path(
    post,
    path = "/api/v1/projects/{project_id}/targets",
    tag = "targets",
    params(("project_id" = i64, Path, description = "Project id")),
    request_body = CreateTargetRequest,
    responses(
        (status = 201, description = "Target created", body = TargetResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_target(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(project_id): Path<i64>,
    Json(request): Json<CreateTargetRequest>,
) -> Result<(StatusCode, Json<TargetResponse>), ApiError> {
    let project_id = ProjectId::new(project_id);
    state.authorize(&user, project_id).await?;

    if request.target_name.trim().is_empty() {
        return Err(ApiError::validation("target_name must not be empty"));
    }

    let target = state.targets.create(project_id, request.target_name).await?;
    Ok((StatusCode::CREATED, Json(target.into())))
}

/// Rename a target
#[utoipa::path(
    put,
    path = "/api/v1/targets/{target_id}",
    tag = "targets",
    params(("target_id" = i64, Path, description = "Target id")),
    request_body = CreateTargetRequest,
    responses(
        (status = 200, description = "Target updated", body = TargetResponse),
        (status = 404, description = "Target not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_target(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(target_id): Path<i64>,
    Json(request): Json<CreateTargetRequest>,
) -> Result<Json<TargetResponse>, ApiError> {
    let target_id = TargetId::new(target_id);
    let existing = state
        .targets
        .find_by_id(target_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Target not found: {target_id}")))?;
    state.authorize(&user, existing.project_id).await?;

    let target = state.targets.update(target_id, request.target_name).await?;
    Ok(Json(target.into()))
}

/// Delete a target; its bugs go with it
#[utoipa::path(
    delete,
    path = "/api/v1/targets/{target_id}",
    tag = "targets",
    params(("target_id" = i64, Path, description = "Target id")),
    responses(
        (status = 204, description = "Target deleted"),
        (status = 404, description = "Target not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_target(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(target_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let target_id = TargetId::new(target_id);
    let existing = state
        .targets
        .find_by_id(target_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Target not found: {target_id}")))?;
    state.authorize(&user, existing.project_id).await?;

    state.targets.delete(target_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
