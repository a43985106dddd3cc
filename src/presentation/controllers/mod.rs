//! HTTP controllers

pub mod admin;
pub mod bug_children;
pub mod bugs;
pub mod health;
pub mod information;
pub mod projects;
pub mod scopes;
pub mod targets;
pub mod templates;

use std::sync::Arc;

use crate::application::access::AccessControlService;
use crate::application::auth::use_cases::{
    ChangePasswordUseCase, CreateUserUseCase, LoginUseCase, ResetPasswordUseCase,
    ValidateTokenUseCase,
};
use crate::application::report::ReportAssembler;
use crate::domain::assessment::entities::Bug;
use crate::domain::assessment::repositories::{
    BugRepository, InformationRepository, ProjectRepository, ScopeRepository, TargetRepository,
    TemplateRepository,
};
use crate::domain::assessment::value_objects::{BugId, ProjectId};
use crate::domain::auth::entities::User;
use crate::domain::auth::repositories::{ProjectAccessRepository, UserRepository};
use crate::presentation::error::ApiError;

/// Shared application state wired in `app.rs`
#[derive(Clone)]
pub struct AppState {
    pub projects: Arc<dyn ProjectRepository>,
    pub targets: Arc<dyn TargetRepository>,
    pub scopes: Arc<dyn ScopeRepository>,
    pub information: Arc<dyn InformationRepository>,
    pub bugs: Arc<dyn BugRepository>,
    pub templates: Arc<dyn TemplateRepository>,
    pub users: Arc<dyn UserRepository>,
    pub project_access: Arc<dyn ProjectAccessRepository>,
    pub access_control: Arc<AccessControlService>,
    pub report_assembler: Arc<ReportAssembler>,
    pub login_use_case: Arc<LoginUseCase>,
    pub validate_token_use_case: Arc<ValidateTokenUseCase>,
    pub create_user_use_case: Arc<CreateUserUseCase>,
    pub change_password_use_case: Arc<ChangePasswordUseCase>,
    pub reset_password_use_case: Arc<ResetPasswordUseCase>,
    pub token_ttl_hours: u64,
}

impl AppState {
    /// Access check shared by all project-scoped handlers
    pub(crate) async fn authorize(
        &self,
        user: &User,
        project_id: ProjectId,
    ) -> Result<(), ApiError> {
        self.access_control
            .authorize(user, project_id)
            .await
            .map_err(ApiError::from)
    }

    /// Load a bug and authorize against the project it belongs to. Used by
    /// every bug- and bug-child-scoped handler.
    pub(crate) async fn authorized_bug(&self, user: &User, bug_id: BugId) -> Result<Bug, ApiError> {
        let bug = self
            .bugs
            .find_by_id(bug_id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Bug not found: {bug_id}")))?;
        self.authorize(user, bug.project_id).await?;
        Ok(bug)
    }
}
