//! Shared types and models for the farm weather dashboard
//!
//! This crate contains types shared between the backend, the browser dashboard
//! (via WASM), and the agricultural insight engine.

pub mod insights;
pub mod models;
pub mod types;
pub mod validation;

pub use insights::*;
pub use models::*;
pub use types::*;
pub use validation::*;
