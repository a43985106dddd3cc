//! Access control service
//!
//! Resolves which projects a user may act on. Admins are unrestricted and
//! are never answered with an enumerated id set; regular users get the set
//! of projects with an explicit `has_access = true` grant.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::assessment::value_objects::ProjectId;
use crate::domain::auth::entities::User;
use crate::domain::auth::repositories::ProjectAccessRepository;
use crate::domain::errors::DomainError;

/// The set of projects a user may act on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectScope {
    /// Unrestricted (admins). Callers must not enumerate.
    All,
    /// Explicitly granted project ids
    Ids(HashSet<ProjectId>),
}

impl ProjectScope {
    pub fn contains(&self, project_id: ProjectId) -> bool {
        match self {
            ProjectScope::All => true,
            ProjectScope::Ids(ids) => ids.contains(&project_id),
        }
    }
}

/// Service answering project-access questions for authenticated users
pub struct AccessControlService {
    access_repository: Arc<dyn ProjectAccessRepository>,
}

impl AccessControlService {
    pub fn new(access_repository: Arc<dyn ProjectAccessRepository>) -> Self {
        Self { access_repository }
    }

    /// Resolve the projects the user may act on
    pub async fn accessible_projects(&self, user: &User) -> Result<ProjectScope, DomainError> {
        if user.is_admin() {
            return Ok(ProjectScope::All);
        }

        let ids = self.access_repository.granted_project_ids(user.id).await?;
        Ok(ProjectScope::Ids(ids))
    }

    /// Succeed silently when the user may act on the project, fail with
    /// PermissionDenied otherwise. Every project-scoped operation calls this
    /// with the id of the root project the entity transitively belongs to.
    pub async fn authorize(&self, user: &User, project_id: ProjectId) -> Result<(), DomainError> {
        if user.is_admin() {
            return Ok(());
        }

        let granted = self.access_repository.granted_project_ids(user.id).await?;
        if granted.contains(&project_id) {
            Ok(())
        } else {
            tracing::debug!(
                user_id = %user.id,
                project_id = %project_id,
                "project access denied"
            );
            Err(DomainError::PermissionDenied)
        }
    }
}
