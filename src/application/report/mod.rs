//! Report assembly
//!
//! Builds the full nested project report from bulk-loaded rows. The module
//! is split into the wire-stable document models and the assembler that
//! folds raw entities into them.

pub mod assembler;
pub mod models;

pub use assembler::ReportAssembler;
pub use models::*;
