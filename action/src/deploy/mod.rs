//! Deployment module

pub mod delete;
pub mod deployer;
pub mod fsm;
pub mod log_bundle;
pub mod naming;
pub mod poller;
pub mod preview;
