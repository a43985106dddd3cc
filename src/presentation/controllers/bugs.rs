//! Bug endpoints

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::str::FromStr;

use crate::domain::assessment::repositories::{BugPatch, NewBug};
use crate::domain::assessment::value_objects::{BugCategory, BugId, ProjectId, Severity, TargetId};
use crate::presentation::auth::extractors::AuthUser;
use crate::presentation::error::ApiError;
use crate::presentation::models::{BugResponse, CreateBugRequest, ErrorResponse, UpdateBugRequest};

use super::AppState;

/// List a project's bugs
#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}/bugs",
    tag = "bugs",
    params(("project_id" = i64, Path, description = "Project id")),
    responses(
        (status = 200, description = "Bugs in creation order", body = [BugResponse])
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_bugs(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(project_id): Path<i64>,
) -> Result<Json<Vec<BugResponse>>, ApiError> {
    let project_id = ProjectId::new(project_id);
    state.authorize(&user, project_id).await?;

    let bugs = state.bugs.list_for_project(project_id).await?;
    Ok(Json(bugs.into_iter().map(Into::into).collect()))
}

/// Record a new bug. Category and severity are validated against their
/// closed value sets before anything reaches the store.
#[utoipa::path(
    post,
    path = "/api/v1/projects/{project_id}/bugs",
    tag = "bugs",
    params(("project_id" = i64, Path, description = "Project id")),
    request_body = CreateBugRequest,
    responses(
        (status = 201, description = "Bug created", body = BugResponse),
        (status = 404, description = "Project or target not found", body = ErrorResponse),
        (status = 422, description = "Invalid category or severity", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_bug(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(project_id): Path<i64>,
    Json(request): Json<CreateBugRequest>,
) -> Result<(StatusCode, Json<BugResponse>), ApiError> {
    let project_id = ProjectId::new(project_id);
    state.authorize(&user, project_id).await?;

    let category = BugCategory::from_str(&request.category)?;
    let severity = Severity::from_str(&request.severity)?;

    if request.heading.trim().is_empty() {
        return Err(ApiError::validation("heading must not be empty"));
    }

    let bug = state
        .bugs
        .create(
            project_id,
            NewBug {
                target_id: TargetId::new(request.target_id),
                category,
                heading: request.heading,
                severity,
                description: request.description,
                recommendation_content: request.recommendation_content,
            },
        )
        .await?;

    tracing::info!(bug_id = %bug.id, project_id = %project_id, "bug recorded");
    Ok((StatusCode::CREATED, Json(bug.into())))
}

/// Fetch a single bug
#[utoipa::path(
    get,
    path = "/api/v1/bugs/{bug_id}",
    tag = "bugs",
    params(("bug_id" = i64, Path, description = "Bug id")),
    responses(
        (status = 200, description = "Bug", body = BugResponse),
        (status = 404, description = "Bug not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_bug(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(bug_id): Path<i64>,
) -> Result<Json<BugResponse>, ApiError> {
    let bug = state.authorized_bug(&user, BugId::new(bug_id)).await?;
    Ok(Json(bug.into()))
}

/// Update a bug; unspecified fields retain their prior value
#[utoipa::path(
    put,
    path = "/api/v1/bugs/{bug_id}",
    tag = "bugs",
    params(("bug_id" = i64, Path, description = "Bug id")),
    request_body = UpdateBugRequest,
    responses(
        (status = 200, description = "Bug updated", body = BugResponse),
        (status = 404, description = "Bug not found", body = ErrorResponse),
        (status = 422, description = "Invalid category or severity", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_bug(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(bug_id): Path<i64>,
    Json(request): Json<UpdateBugRequest>,
) -> Result<Json<BugResponse>, ApiError> {
    let bug_id = BugId::new(bug_id);
    state.authorized_bug(&user, bug_id).await?;

    let category = request
        .category
        .as_deref()
        .map(BugCategory::from_str)
        .transpose()?;
    let severity = request
        .severity
        .as_deref()
        .map(Severity::from_str)
        .transpose()?;

    let bug = state
        .bugs
        .update(
            bug_id,
            BugPatch {
                target_id: request.target_id.map(TargetId::new),
                category,
                heading: request.heading,
                severity,
                description: request.description,
                recommendation_content: request.recommendation_content,
            },
        )
        .await?;

    Ok(Json(bug.into()))
}

/// Delete a bug and its children
#[utoipa::path(
    delete,
    path = "/api/v1/bugs/{bug_id}",
    tag = "bugs",
    params(("bug_id" = i64, Path, description = "Bug id")),
    responses(
        (status = 204, description = "Bug deleted"),
        (status = 404, description = "Bug not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_bug(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(bug_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let bug_id = BugId::new(bug_id);
    state.authorized_bug(&user, bug_id).await?;

    state.bugs.delete(bug_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
