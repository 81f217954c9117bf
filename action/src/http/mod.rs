//! Platform API client

pub mod apps;
pub mod client;
