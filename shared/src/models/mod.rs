//! Domain models for the farm weather dashboard

mod insights;
mod weather;

pub use insights::*;
pub use weather::*;
