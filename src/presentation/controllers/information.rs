//! Collected information endpoints

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::domain::assessment::value_objects::ProjectId;
use crate::presentation::auth::extractors::AuthUser;
use crate::presentation::error::ApiError;
use crate::presentation::models::{CreateInformationRequest, ErrorResponse, InformationResponse};

use super::AppState;

/// List a project's collected information notes
#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}/information",
    tag = "information",
    params(("project_id" = i64, Path, description = "Project id")),
    responses(
        (status = 200, description = "Notes in creation order", body = [InformationResponse])
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_information(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(project_id): Path<i64>,
) -> Result<Json<Vec<InformationResponse>>, ApiError> {
    let project_id = ProjectId::new(project_id);
    state.authorize(&user, project_id).await?;

    let notes = state.information.list_for_project(project_id).await?;
    Ok(Json(notes.into_iter().map(Into::into).collect()))
}

/// Add an information note to a project
#[utoipa::path(
    post,
    path = "/api/v1/projects/{project_id}/information",
    tag = "information",
    params(("project_id" = i64, Path, description = "Project id")),
    request_body = CreateInformationRequest,
    responses(
        (status = 201, description = "Note created", body = InformationResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_information(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(project_id): Path<i64>,
    Json(request): Json<CreateInformationRequest>,
) -> Result<(StatusCode, Json<InformationResponse>), ApiError> {
    let project_id = ProjectId::new(project_id);
    state.authorize(&user, project_id).await?;

    let note = state
        .information
        .create(project_id, request.information)
        .await?;
    Ok((StatusCode::CREATED, Json(note.into())))
}

/// Update an information note
#[utoipa::path(
    put,
    path = "/api/v1/information/{information_id}",
    tag = "information",
    params(("information_id" = i64, Path, description = "Note id")),
    request_body = CreateInformationRequest,
    responses(
        (status = 200, description = "Note updated", body = InformationResponse),
        (status = 404, description = "Note not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_information(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(information_id): Path<i64>,
    Json(request): Json<CreateInformationRequest>,
) -> Result<Json<InformationResponse>, ApiError> {
    let existing = state
        .information
        .find_by_id(information_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Note not found: {information_id}")))?;
    state.authorize(&user, existing.project_id).await?;

    let note = state
        .information
        .update(information_id, request.information)
        .await?;
    Ok(Json(note.into()))
}

/// Delete an information note
#[utoipa::path(
    delete,
    path = "/api/v1/information/{information_id}",
    tag = "information",
    params(("information_id" = i64, Path, description = "Note id")),
    responses(
        (status = 204, description = "Note deleted"),
        (status = 404, description = "Note not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_information(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(information_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let existing = state
        .information
        .find_by_id(information_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Note not found: {information_id}")))?;
    state.authorize(&user, existing.project_id).await?;

    state.information.delete(information_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
