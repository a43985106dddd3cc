//! Vulnerability template catalog endpoints
//!
//! The catalog is project-independent and readable by any authenticated
//! user; it feeds the bug-entry form with pre-filled descriptions and
//! remediation text.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::str::FromStr;

use crate::domain::assessment::repositories::{NewTemplate, TemplatePatch};
use crate::domain::assessment::value_objects::{Severity, TemplateId};
use crate::presentation::auth::extractors::AuthUser;
use crate::presentation::error::ApiError;
use crate::presentation::models::{
    CreateTemplateRequest, ErrorResponse, TemplateResponse, UpdateTemplateRequest,
};

use super::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/templates",
    tag = "templates",
    responses(
        (status = 200, description = "Catalog entries in creation order", body = [TemplateResponse])
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_templates(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> Result<Json<Vec<TemplateResponse>>, ApiError> {
    let templates = state.templates.list().await?;
    Ok(Json(templates.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/templates",
    tag = "templates",
    request_body = CreateTemplateRequest,
    responses(
        (status = 201, description = "Template created", body = TemplateResponse),
        (status = 422, description = "Invalid severity", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_template(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Json(request): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<TemplateResponse>), ApiError> {
    let severity = request
        .severity
        .as_deref()
        .map(Severity::from_str)
        .transpose()?;

    let template = state
        .templates
        .create(NewTemplate {
            name: request.name,
            description: request.description,
            recommendations: request.recommendations,
            severity,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(template.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/templates/{template_id}",
    tag = "templates",
    params(("template_id" = i64, Path, description = "Template id")),
    responses(
        (status = 200, description = "Template", body = TemplateResponse),
        (status = 404, description = "Template not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_template(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(template_id): Path<i64>,
) -> Result<Json<TemplateResponse>, ApiError> {
    let template_id = TemplateId::new(template_id);
    let template = state
        .templates
        .find_by_id(template_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Template not found: {template_id}")))?;
    Ok(Json(template.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/templates/{template_id}",
    tag = "templates",
    params(("template_id" = i64, Path, description = "Template id")),
    request_body = UpdateTemplateRequest,
    responses(
        (status = 200, description = "Template updated", body = TemplateResponse),
        (status = 404, description = "Template not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_template(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(template_id): Path<i64>,
    Json(request): Json<UpdateTemplateRequest>,
) -> Result<Json<TemplateResponse>, ApiError> {
    let severity = match request.severity {
        Some(Some(raw)) => Some(Some(Severity::from_str(&raw)?)),
        Some(None) => Some(None),
        None => None,
    };

    let template = state
        .templates
        .update(
            TemplateId::new(template_id),
            TemplatePatch {
                name: request.name,
                description: request.description,
                recommendations: request.recommendations,
                severity,
            },
        )
        .await?;
    Ok(Json(template.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/templates/{template_id}",
    tag = "templates",
    params(("template_id" = i64, Path, description = "Template id")),
    responses(
        (status = 204, description = "Template deleted"),
        (status = 404, description = "Template not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_template(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(template_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.templates.delete(TemplateId::new(template_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
