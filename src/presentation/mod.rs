//! Presentation Layer - HTTP API controllers and routing

pub mod auth;
pub mod controllers;
pub mod error;
pub mod models;
pub mod routes;

pub use routes::create_router;
