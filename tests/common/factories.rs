//! Test data factories with sensible defaults

use chrono::Utc;
use std::sync::Arc;

use redport::application::access::AccessControlService;
use redport::application::report::ReportAssembler;
use redport::domain::assessment::repositories::NewBug;
use redport::domain::assessment::value_objects::{BugCategory, Severity, TargetId};
use redport::domain::auth::entities::User;
use redport::domain::auth::value_objects::{PasswordHash, UserId, UserRole};

use super::mocks::InMemoryStore;

/// Factory for user entities
pub struct UserFactory;

impl UserFactory {
    pub fn admin(id: i64) -> User {
        Self::build(id, "admin", UserRole::Admin)
    }

    pub fn user(id: i64) -> User {
        Self::build(id, "analyst", UserRole::User)
    }

    pub fn inactive(id: i64) -> User {
        let mut user = Self::build(id, "ghost", UserRole::User);
        user.is_active = false;
        user
    }

    fn build(id: i64, username: &str, role: UserRole) -> User {
        User {
            id: UserId::new(id),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: PasswordHash::new("$argon2id$stub".to_string()),
            role,
            is_active: true,
            created_at: Utc::now(),
            created_by: None,
        }
    }
}

/// Factory for bug creation fields
pub struct BugFactory;

impl BugFactory {
    pub fn application(target_id: TargetId, heading: &str) -> NewBug {
        NewBug {
            target_id,
            category: BugCategory::Application,
            heading: heading.to_string(),
            severity: Severity::High,
            description: format!("{heading} description"),
            recommendation_content: String::new(),
        }
    }

    pub fn source_code(target_id: TargetId, heading: &str) -> NewBug {
        NewBug {
            target_id,
            category: BugCategory::SourceCode,
            heading: heading.to_string(),
            severity: Severity::Medium,
            description: format!("{heading} description"),
            recommendation_content: String::new(),
        }
    }
}

/// Assembler wired against a shared in-memory store
pub fn assembler_for(store: &InMemoryStore) -> ReportAssembler {
    ReportAssembler::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
    )
}

/// Access control service wired against a shared in-memory store
pub fn access_control_for(store: &InMemoryStore) -> AccessControlService {
    AccessControlService::new(Arc::new(store.clone()))
}
