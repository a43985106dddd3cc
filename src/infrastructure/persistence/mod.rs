//! SQLx-backed repositories for the assessment store

pub mod bug_repository;
pub mod information_repository;
pub mod project_repository;
pub mod scope_repository;
pub mod target_repository;
pub mod template_repository;

pub use bug_repository::SqlxBugRepository;
pub use information_repository::SqlxInformationRepository;
pub use project_repository::SqlxProjectRepository;
pub use scope_repository::SqlxScopeRepository;
pub use target_repository::SqlxTargetRepository;
pub use template_repository::SqlxTemplateRepository;

use crate::domain::errors::DomainError;

/// Map a store failure onto the domain taxonomy. Unique-key violations
/// surface as Conflict; everything else is an opaque database error.
pub(crate) fn db_error(e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return DomainError::Conflict {
            message: db_err.to_string(),
        };
    }
    tracing::error!("Store error: {}", e);
    DomainError::Database {
        message: e.to_string(),
    }
}
