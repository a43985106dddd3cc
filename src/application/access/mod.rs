//! Project-level access control

pub mod service;

pub use service::{AccessControlService, ProjectScope};
