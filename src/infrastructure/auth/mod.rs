//! Authentication infrastructure
//!
//! JWT token handling, Argon2id password hashing, and SQLx-backed
//! repositories for users and project access grants.

pub mod jwt_service;
pub mod password_hasher;
pub mod project_access_repository;
pub mod user_repository;

pub use jwt_service::JwtService;
pub use password_hasher::PasswordHasher;
pub use project_access_repository::SqlxProjectAccessRepository;
pub use user_repository::SqlxUserRepository;
