//! App Platform deploy action
//!
//! Deploys an app spec from a CI pipeline, follows the resulting deployment
//! to a terminal phase and reports its logs and live URL.

pub mod app;
pub mod deploy;
pub mod errors;
pub mod github;
pub mod http;
pub mod logs;
pub mod utils;
