//! Shared types and planning logic for the inventory production planner
//!
//! This crate is used by the backend server and by the WASM client module.
//! It performs no I/O: the planner works on a catalog snapshot handed to it.

pub mod catalog;
pub mod models;
pub mod planning;
pub mod validation;

pub use catalog::*;
pub use models::*;
pub use planning::*;
pub use validation::*;
