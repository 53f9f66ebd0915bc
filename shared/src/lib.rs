//! Shared types and models for the Warehouse Execution Core
//!
//! This crate contains the domain models, the handling-unit state machine and
//! the ledger replay logic shared between the backend and its tests.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
