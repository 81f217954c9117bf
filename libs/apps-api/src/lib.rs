//! App Platform API models
//!
//! Serde views of the resources the action reads and writes: app specs,
//! apps, deployments and log descriptors.

pub mod models;

pub use models::*;
