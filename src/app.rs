//! Application setup and wiring

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;

use crate::application::access::AccessControlService;
use crate::application::auth::use_cases::{
    ChangePasswordUseCase, CreateUserUseCase, LoginUseCase, ResetPasswordUseCase,
    ValidateTokenUseCase,
};
use crate::application::report::ReportAssembler;
use crate::config::Config;
use crate::infrastructure::auth::{
    JwtService, PasswordHasher, SqlxProjectAccessRepository, SqlxUserRepository,
};
use crate::infrastructure::persistence::{
    SqlxBugRepository, SqlxInformationRepository, SqlxProjectRepository, SqlxScopeRepository,
    SqlxTargetRepository, SqlxTemplateRepository,
};
use crate::presentation::controllers::AppState;
use crate::presentation::create_router;

/// Build the application router: connect the pool, run migrations, wire
/// repositories and use cases, and assemble the HTTP surface.
pub async fn create_app(config: Config) -> Result<Router, Box<dyn std::error::Error>> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    // Repositories
    let projects = Arc::new(SqlxProjectRepository::new(pool.clone()));
    let targets = Arc::new(SqlxTargetRepository::new(pool.clone()));
    let scopes = Arc::new(SqlxScopeRepository::new(pool.clone()));
    let information = Arc::new(SqlxInformationRepository::new(pool.clone()));
    let bugs = Arc::new(SqlxBugRepository::new(pool.clone()));
    let templates = Arc::new(SqlxTemplateRepository::new(pool.clone()));
    let users = Arc::new(SqlxUserRepository::new(pool.clone()));
    let project_access = Arc::new(SqlxProjectAccessRepository::new(pool.clone()));

    // Services
    let password_hasher = Arc::new(PasswordHasher::new());
    let jwt_service = Arc::new(JwtService::new(
        config.auth.jwt_secret.clone(),
        config.auth.token_ttl_hours,
    ));
    let access_control = Arc::new(AccessControlService::new(project_access.clone()));
    let report_assembler = Arc::new(ReportAssembler::new(
        projects.clone(),
        targets.clone(),
        scopes.clone(),
        information.clone(),
        bugs.clone(),
    ));

    // Use cases
    let login_use_case = Arc::new(LoginUseCase::new(
        users.clone(),
        password_hasher.clone(),
        jwt_service.clone(),
    ));
    let validate_token_use_case = Arc::new(ValidateTokenUseCase::new(jwt_service.clone()));
    let create_user_use_case = Arc::new(CreateUserUseCase::new(
        users.clone(),
        password_hasher.clone(),
    ));
    let change_password_use_case = Arc::new(ChangePasswordUseCase::new(
        users.clone(),
        password_hasher.clone(),
    ));
    let reset_password_use_case = Arc::new(ResetPasswordUseCase::new(
        users.clone(),
        password_hasher.clone(),
    ));

    let app_state = AppState {
        projects,
        targets,
        scopes,
        information,
        bugs,
        templates,
        users,
        project_access,
        access_control,
        report_assembler,
        login_use_case,
        validate_token_use_case,
        create_user_use_case,
        change_password_use_case,
        reset_password_use_case,
        token_ttl_hours: config.auth.token_ttl_hours,
    };

    Ok(create_router(app_state, &config))
}
