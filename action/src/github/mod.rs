//! Workflow step integration

pub mod action;
pub mod context;
