//! Project endpoints

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::application::report::Report;
use crate::application::access::ProjectScope;
use crate::domain::assessment::repositories::{NewProject, ProjectPatch};
use crate::domain::assessment::value_objects::ProjectId;
use crate::presentation::auth::extractors::AuthUser;
use crate::presentation::error::ApiError;
use crate::presentation::models::{
    CreateProjectRequest, ErrorResponse, ProjectResponse, UpdateProjectRequest,
};

use super::AppState;

/// List projects visible to the caller
#[utoipa::path(
    get,
    path = "/api/v1/projects",
    tag = "projects",
    responses(
        (status = 200, description = "Accessible projects", body = [ProjectResponse])
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_projects(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<ProjectResponse>>, ApiError> {
    let scope = state.access_control.accessible_projects(&user).await?;

    let projects = match scope {
        ProjectScope::All => state.projects.list().await?,
        ProjectScope::Ids(ids) => state.projects.list_by_ids(&ids).await?,
    };

    Ok(Json(projects.into_iter().map(Into::into).collect()))
}

/// Create a project
#[utoipa::path(
    post,
    path = "/api/v1/projects",
    tag = "projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_project(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), ApiError> {
    // Creating a project is an admin operation; non-admins only ever see
    // granted projects.
    if !user.is_admin() {
        return Err(ApiError::forbidden("Admin access required"));
    }

    if request.project_name.trim().is_empty() {
        return Err(ApiError::validation("project_name must not be empty"));
    }

    let project = state
        .projects
        .create(NewProject {
            project_name: request.project_name,
            system_name: request.system_name,
        })
        .await?;

    tracing::info!(project_id = %project.id, "project created");
    Ok((StatusCode::CREATED, Json(project.into())))
}

/// Fetch a single project
#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}",
    tag = "projects",
    params(("project_id" = i64, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project", body = ProjectResponse),
        (status = 403, description = "No access grant", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_project(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(project_id): Path<i64>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let project_id = ProjectId::new(project_id);
    state.authorize(&user, project_id).await?;

    let project = state
        .projects
        .find_by_id(project_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Project not found: {project_id}")))?;

    Ok(Json(project.into()))
}

/// Update a project
#[utoipa::path(
    put,
    path = "/api/v1/projects/{project_id}",
    tag = "projects",
    params(("project_id" = i64, Path, description = "Project id")),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Project updated", body = ProjectResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_project(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(project_id): Path<i64>,
    Json(request): Json<UpdateProjectRequest>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let project_id = ProjectId::new(project_id);
    state.authorize(&user, project_id).await?;

    let project = state
        .projects
        .update(
            project_id,
            ProjectPatch {
                project_name: request.project_name,
                system_name: request.system_name,
            },
        )
        .await?;

    Ok(Json(project.into()))
}

/// Delete a project and everything it owns
#[utoipa::path(
    delete,
    path = "/api/v1/projects/{project_id}",
    tag = "projects",
    params(("project_id" = i64, Path, description = "Project id")),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 404, description = "Project not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_project(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(project_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let project_id = ProjectId::new(project_id);
    state.authorize(&user, project_id).await?;

    state.projects.delete(project_id).await?;
    tracing::info!(project_id = %project_id, "project deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Assemble the full nested report for a project
#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}/all-data",
    tag = "projects",
    params(("project_id" = i64, Path, description = "Project id")),
    responses(
        (status = 200, description = "Aggregated project report", body = Report),
        (status = 403, description = "No access grant", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_project_report(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(project_id): Path<i64>,
) -> Result<Json<Report>, ApiError> {
    let project_id = ProjectId::new(project_id);
    state.authorize(&user, project_id).await?;

    let report = state.report_assembler.assemble(project_id).await?;
    Ok(Json(report))
}
