//! Route definitions and router assembly

use std::time::Duration;

use axum::{
    Router, middleware,
    extract::{Request, State},
    middleware::Next,
    response::Response,
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::Config;
use crate::presentation::auth::{
    controller::{change_password, login, me},
    extractors::AuthState,
};
use crate::presentation::controllers::{
    AppState, admin, bug_children, bugs, health, information, projects, scopes, targets, templates,
};
use crate::presentation::models::*;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::auth::controller::login,
        crate::presentation::auth::controller::me,
        crate::presentation::auth::controller::change_password,
        crate::presentation::controllers::projects::list_projects,
        crate::presentation::controllers::projects::create_project,
        crate::presentation::controllers::projects::get_project,
        crate::presentation::controllers::projects::update_project,
        crate::presentation::controllers::projects::delete_project,
        crate::presentation::controllers::projects::get_project_report,
        crate::presentation::controllers::targets::list_targets,
        crate::presentation::controllers::targets::create_target,
        crate::presentation::controllers::targets::update_target,
        crate::presentation::controllers::targets::delete_target,
        crate::presentation::controllers::scopes::list_scopes,
        crate::presentation::controllers::scopes::create_scope,
        crate::presentation::controllers::scopes::update_scope,
        crate::presentation::controllers::scopes::delete_scope,
        crate::presentation::controllers::information::list_information,
        crate::presentation::controllers::information::create_information,
        crate::presentation::controllers::information::update_information,
        crate::presentation::controllers::information::delete_information,
        crate::presentation::controllers::bugs::list_bugs,
        crate::presentation::controllers::bugs::create_bug,
        crate::presentation::controllers::bugs::get_bug,
        crate::presentation::controllers::bugs::update_bug,
        crate::presentation::controllers::bugs::delete_bug,
        crate::presentation::controllers::bug_children::list_affected_objects,
        crate::presentation::controllers::bug_children::create_affected_object,
        crate::presentation::controllers::bug_children::delete_affected_object,
        crate::presentation::controllers::bug_children::get_recommendations,
        crate::presentation::controllers::bug_children::create_recommendation,
        crate::presentation::controllers::bug_children::delete_recommendation,
        crate::presentation::controllers::bug_children::list_images,
        crate::presentation::controllers::bug_children::create_image,
        crate::presentation::controllers::bug_children::delete_image,
        crate::presentation::controllers::bug_children::list_cve_records,
        crate::presentation::controllers::bug_children::create_cve_record,
        crate::presentation::controllers::bug_children::delete_cve_record,
        crate::presentation::controllers::templates::list_templates,
        crate::presentation::controllers::templates::create_template,
        crate::presentation::controllers::templates::get_template,
        crate::presentation::controllers::templates::update_template,
        crate::presentation::controllers::templates::delete_template,
        crate::presentation::controllers::admin::list_users,
        crate::presentation::controllers::admin::create_user,
        crate::presentation::controllers::admin::update_user,
        crate::presentation::controllers::admin::delete_user,
        crate::presentation::controllers::admin::reset_password,
        crate::presentation::controllers::admin::list_project_access,
        crate::presentation::controllers::admin::grant_project_access,
        crate::presentation::controllers::admin::revoke_project_access,
        crate::presentation::controllers::health::health_check
    ),
    components(
        schemas(
            ErrorResponse,
            CreateProjectRequest,
            UpdateProjectRequest,
            ProjectResponse,
            CreateTargetRequest,
            TargetResponse,
            CreateScopeRequest,
            UpdateScopeRequest,
            ScopeResponse,
            CreateInformationRequest,
            InformationResponse,
            CreateBugRequest,
            UpdateBugRequest,
            BugResponse,
            CreateAffectedObjectRequest,
            AffectedObjectResponse,
            CreateRecommendationRequest,
            RecommendationResponse,
            RecommendationListResponse,
            CreateBugImageRequest,
            BugImageResponse,
            CreateCveRecordRequest,
            CveRecordResponse,
            CreateTemplateRequest,
            UpdateTemplateRequest,
            TemplateResponse,
            GrantAccessRequest,
            ProjectAccessResponse,
            crate::presentation::auth::models::LoginRequest,
            crate::presentation::auth::models::TokenResponse,
            crate::presentation::auth::models::ChangePasswordRequest,
            crate::presentation::auth::models::UserResponse,
            crate::presentation::auth::models::CreateUserRequest,
            crate::presentation::auth::models::UpdateUserRequest,
            crate::presentation::auth::models::ResetPasswordRequest,
            crate::presentation::controllers::health::HealthResponse,
            crate::application::report::Report,
            crate::domain::assessment::value_objects::BugCategory,
            crate::domain::assessment::value_objects::Severity,
            crate::domain::auth::value_objects::UserRole
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "projects", description = "Assessment project management and report assembly"),
        (name = "targets", description = "Assessment targets within a project"),
        (name = "scopes", description = "Assessment scope entries"),
        (name = "information", description = "Collected information notes"),
        (name = "bugs", description = "Vulnerability findings"),
        (name = "affected-objects", description = "URLs, paths, and files affected by a bug"),
        (name = "recommendations", description = "Remediation steps per bug"),
        (name = "bug-images", description = "Image attachments per bug"),
        (name = "cve", description = "CVE references per bug"),
        (name = "templates", description = "Reusable vulnerability template catalog"),
        (name = "admin", description = "User accounts and project access grants"),
        (name = "health", description = "Service health")
    ),
    info(
        title = "Redport API",
        version = "2.0.0",
        description = "Backend API for managing security-assessment reports: projects, findings, and the aggregated report document."
    )
)]
pub struct ApiDoc;

/// Middleware injecting AuthState into request extensions so extractors can
/// validate tokens without access to the router state type
async fn inject_auth_state_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_state = AuthState {
        validate_token: app_state.validate_token_use_case.clone(),
        user_repository: app_state.users.clone(),
    };
    request.extensions_mut().insert(auth_state);
    next.run(request).await
}

/// Create the application router with the full middleware stack
pub fn create_router(app_state: AppState, config: &Config) -> Router {
    let auth_routes = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/auth/change-password", post(change_password));

    let project_routes = Router::new()
        .route(
            "/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route(
            "/projects/{project_id}",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        .route(
            "/projects/{project_id}/all-data",
            get(projects::get_project_report),
        )
        .route(
            "/projects/{project_id}/targets",
            get(targets::list_targets).post(targets::create_target),
        )
        .route(
            "/targets/{target_id}",
            put(targets::update_target).delete(targets::delete_target),
        )
        .route(
            "/projects/{project_id}/scopes",
            get(scopes::list_scopes).post(scopes::create_scope),
        )
        .route(
            "/scopes/{scope_id}",
            put(scopes::update_scope).delete(scopes::delete_scope),
        )
        .route(
            "/projects/{project_id}/information",
            get(information::list_information).post(information::create_information),
        )
        .route(
            "/information/{information_id}",
            put(information::update_information).delete(information::delete_information),
        );

    let bug_routes = Router::new()
        .route(
            "/projects/{project_id}/bugs",
            get(bugs::list_bugs).post(bugs::create_bug),
        )
        .route(
            "/bugs/{bug_id}",
            get(bugs::get_bug).put(bugs::update_bug).delete(bugs::delete_bug),
        )
        .route(
            "/bugs/{bug_id}/affected-objects",
            get(bug_children::list_affected_objects).post(bug_children::create_affected_object),
        )
        .route(
            "/bugs/{bug_id}/affected-objects/{object_id}",
            axum::routing::delete(bug_children::delete_affected_object),
        )
        .route(
            "/bugs/{bug_id}/recommendations",
            get(bug_children::get_recommendations).post(bug_children::create_recommendation),
        )
        .route(
            "/bugs/{bug_id}/recommendations/{recommendation_id}",
            axum::routing::delete(bug_children::delete_recommendation),
        )
        .route(
            "/bugs/{bug_id}/images",
            get(bug_children::list_images).post(bug_children::create_image),
        )
        .route(
            "/bugs/{bug_id}/images/{image_id}",
            axum::routing::delete(bug_children::delete_image),
        )
        .route(
            "/bugs/{bug_id}/cve",
            get(bug_children::list_cve_records).post(bug_children::create_cve_record),
        )
        .route(
            "/bugs/{bug_id}/cve/{cve_id}",
            axum::routing::delete(bug_children::delete_cve_record),
        );

    let template_routes = Router::new()
        .route(
            "/templates",
            get(templates::list_templates).post(templates::create_template),
        )
        .route(
            "/templates/{template_id}",
            get(templates::get_template)
                .put(templates::update_template)
                .delete(templates::delete_template),
        );

    let admin_routes = Router::new()
        .route(
            "/admin/users",
            get(admin::list_users).post(admin::create_user),
        )
        .route(
            "/admin/users/{user_id}",
            put(admin::update_user).delete(admin::delete_user),
        )
        .route(
            "/admin/users/{user_id}/reset-password",
            post(admin::reset_password),
        )
        .route(
            "/admin/project-access",
            get(admin::list_project_access)
                .post(admin::grant_project_access)
                .delete(admin::revoke_project_access),
        );

    let api_routes = auth_routes
        .merge(project_routes)
        .merge(bug_routes)
        .merge(template_routes)
        .merge(admin_routes);

    // CORS from configuration; a single "*" origin mirrors the request
    // origin for development setups.
    let cors_layer = if config.server.allowed_origins.len() == 1
        && config.server.allowed_origins[0] == "*"
    {
        CorsLayer::new()
            .allow_origin(tower_http::cors::AllowOrigin::mirror_request())
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ])
            .max_age(Duration::from_secs(3600))
    } else {
        let mut layer = CorsLayer::new();
        for origin in &config.server.allowed_origins {
            match axum::http::HeaderValue::from_str(origin) {
                Ok(origin_header) => {
                    layer = layer.allow_origin(origin_header);
                }
                Err(_) => {
                    tracing::warn!(origin, "Invalid CORS origin in config; skipping");
                }
            }
        }
        layer
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ])
            .max_age(Duration::from_secs(3600))
    };

    let mut router = Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health::health_check));

    // Swagger UI is opt-in so production deployments can keep docs private.
    if config.server.enable_docs {
        router =
            router.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_seconds,
        )))
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            inject_auth_state_middleware,
        ));

    router.layer(service_builder).with_state(app_state)
}
