//! Redport - Security-assessment report backend
//!
//! Manages assessment projects, findings, and access grants, and folds a
//! project's stored entities into one nested report document.

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod presentation;

pub use app::create_app;
pub use config::Config;
pub use logging::init_tracing;
