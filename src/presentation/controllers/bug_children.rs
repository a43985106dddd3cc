//! Endpoints for bug child records: affected objects, recommendations,
//! images, and CVE references. All of them authorize against the project
//! the parent bug belongs to.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::domain::assessment::value_objects::BugId;
use crate::presentation::auth::extractors::AuthUser;
use crate::presentation::error::ApiError;
use crate::presentation::models::{
    AffectedObjectResponse, BugImageResponse, CreateAffectedObjectRequest, CreateBugImageRequest,
    CreateCveRecordRequest, CreateRecommendationRequest, CveRecordResponse, ErrorResponse,
    RecommendationListResponse, RecommendationResponse,
};

use super::AppState;

// Affected objects

#[utoipa::path(
    get,
    path = "/api/v1/bugs/{bug_id}/affected-objects",
    tag = "affected-objects",
    params(("bug_id" = i64, Path, description = "Bug id")),
    responses(
        (status = 200, description = "Affected objects in creation order", body = [AffectedObjectResponse])
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_affected_objects(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(bug_id): Path<i64>,
) -> Result<Json<Vec<AffectedObjectResponse>>, ApiError> {
    let bug_id = BugId::new(bug_id);
    state.authorized_bug(&user, bug_id).await?;

    let objects = state.bugs.list_affected_objects(bug_id).await?;
    Ok(Json(objects.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/bugs/{bug_id}/affected-objects",
    tag = "affected-objects",
    params(("bug_id" = i64, Path, description = "Bug id")),
    request_body = CreateAffectedObjectRequest,
    responses(
        (status = 201, description = "Affected object created", body = AffectedObjectResponse),
        (status = 404, description = "Bug not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_affected_object(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(bug_id): Path<i64>,
    Json(request): Json<CreateAffectedObjectRequest>,
) -> Result<(StatusCode, Json<AffectedObjectResponse>), ApiError> {
    let bug_id = BugId::new(bug_id);
    state.authorized_bug(&user, bug_id).await?;

    let object = state
        .bugs
        .add_affected_object(bug_id, request.object_url)
        .await?;
    Ok((StatusCode::CREATED, Json(object.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/bugs/{bug_id}/affected-objects/{object_id}",
    tag = "affected-objects",
    params(
        ("bug_id" = i64, Path, description = "Bug id"),
        ("object_id" = i64, Path, description = "Affected object id")
    ),
    responses(
        (status = 204, description = "Affected object deleted"),
        (status = 404, description = "Bug or object not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_affected_object(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((bug_id, object_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    state.authorized_bug(&user, BugId::new(bug_id)).await?;
    state.bugs.delete_affected_object(object_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Recommendations

#[utoipa::path(
    get,
    path = "/api/v1/bugs/{bug_id}/recommendations",
    tag = "recommendations",
    params(("bug_id" = i64, Path, description = "Bug id")),
    responses(
        (status = 200, description = "Summary plus ordered step list", body = RecommendationListResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_recommendations(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(bug_id): Path<i64>,
) -> Result<Json<RecommendationListResponse>, ApiError> {
    let bug_id = BugId::new(bug_id);
    let bug = state.authorized_bug(&user, bug_id).await?;

    let rows = state.bugs.list_recommendations(bug_id).await?;
    let list: Vec<String> = rows.into_iter().map(|r| r.recommendation_text).collect();

    // Same fallback rule the report assembler applies.
    let content = if bug.recommendation_content.is_empty() {
        list.join("\n")
    } else {
        bug.recommendation_content
    };

    Ok(Json(RecommendationListResponse {
        bug_id: bug_id.as_i64(),
        content,
        list,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/bugs/{bug_id}/recommendations",
    tag = "recommendations",
    params(("bug_id" = i64, Path, description = "Bug id")),
    request_body = CreateRecommendationRequest,
    responses(
        (status = 201, description = "Recommendation created", body = RecommendationResponse),
        (status = 404, description = "Bug not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_recommendation(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(bug_id): Path<i64>,
    Json(request): Json<CreateRecommendationRequest>,
) -> Result<(StatusCode, Json<RecommendationResponse>), ApiError> {
    let bug_id = BugId::new(bug_id);
    state.authorized_bug(&user, bug_id).await?;

    let recommendation = state
        .bugs
        .add_recommendation(bug_id, request.recommendation_text)
        .await?;
    Ok((StatusCode::CREATED, Json(recommendation.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/bugs/{bug_id}/recommendations/{recommendation_id}",
    tag = "recommendations",
    params(
        ("bug_id" = i64, Path, description = "Bug id"),
        ("recommendation_id" = i64, Path, description = "Recommendation id")
    ),
    responses(
        (status = 204, description = "Recommendation deleted"),
        (status = 404, description = "Bug or recommendation not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_recommendation(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((bug_id, recommendation_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    state.authorized_bug(&user, BugId::new(bug_id)).await?;
    state.bugs.delete_recommendation(recommendation_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Images

#[utoipa::path(
    get,
    path = "/api/v1/bugs/{bug_id}/images",
    tag = "bug-images",
    params(("bug_id" = i64, Path, description = "Bug id")),
    responses(
        (status = 200, description = "Images in creation order", body = [BugImageResponse])
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_images(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(bug_id): Path<i64>,
) -> Result<Json<Vec<BugImageResponse>>, ApiError> {
    let bug_id = BugId::new(bug_id);
    state.authorized_bug(&user, bug_id).await?;

    let images = state.bugs.list_images(bug_id).await?;
    Ok(Json(images.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/bugs/{bug_id}/images",
    tag = "bug-images",
    params(("bug_id" = i64, Path, description = "Bug id")),
    request_body = CreateBugImageRequest,
    responses(
        (status = 201, description = "Image record created", body = BugImageResponse),
        (status = 404, description = "Bug not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_image(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(bug_id): Path<i64>,
    Json(request): Json<CreateBugImageRequest>,
) -> Result<(StatusCode, Json<BugImageResponse>), ApiError> {
    let bug_id = BugId::new(bug_id);
    state.authorized_bug(&user, bug_id).await?;

    let image = state
        .bugs
        .add_image(bug_id, request.filename, request.caption)
        .await?;
    Ok((StatusCode::CREATED, Json(image.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/bugs/{bug_id}/images/{image_id}",
    tag = "bug-images",
    params(
        ("bug_id" = i64, Path, description = "Bug id"),
        ("image_id" = i64, Path, description = "Image id")
    ),
    responses(
        (status = 204, description = "Image record deleted"),
        (status = 404, description = "Bug or image not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_image(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((bug_id, image_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    state.authorized_bug(&user, BugId::new(bug_id)).await?;
    state.bugs.delete_image(image_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// CVE records

#[utoipa::path(
    get,
    path = "/api/v1/bugs/{bug_id}/cve",
    tag = "cve",
    params(("bug_id" = i64, Path, description = "Bug id")),
    responses(
        (status = 200, description = "CVE references in creation order", body = [CveRecordResponse])
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_cve_records(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(bug_id): Path<i64>,
) -> Result<Json<Vec<CveRecordResponse>>, ApiError> {
    let bug_id = BugId::new(bug_id);
    state.authorized_bug(&user, bug_id).await?;

    let records = state.bugs.list_cve_records(bug_id).await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/bugs/{bug_id}/cve",
    tag = "cve",
    params(("bug_id" = i64, Path, description = "Bug id")),
    request_body = CreateCveRecordRequest,
    responses(
        (status = 201, description = "CVE reference created", body = CveRecordResponse),
        (status = 404, description = "Bug not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_cve_record(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(bug_id): Path<i64>,
    Json(request): Json<CreateCveRecordRequest>,
) -> Result<(StatusCode, Json<CveRecordResponse>), ApiError> {
    let bug_id = BugId::new(bug_id);
    state.authorized_bug(&user, bug_id).await?;

    let record = state
        .bugs
        .add_cve_record(bug_id, request.library, request.cve, request.latest_version)
        .await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/bugs/{bug_id}/cve/{cve_id}",
    tag = "cve",
    params(
        ("bug_id" = i64, Path, description = "Bug id"),
        ("cve_id" = i64, Path, description = "CVE record id")
    ),
    responses(
        (status = 204, description = "CVE reference deleted"),
        (status = 404, description = "Bug or record not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_cve_record(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((bug_id, cve_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    state.authorized_bug(&user, BugId::new(bug_id)).await?;
    state.bugs.delete_cve_record(cve_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
