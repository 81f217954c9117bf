//! API models

mod app;
mod deployment;
mod spec;

pub use app::*;
pub use deployment::*;
pub use spec::*;

use serde::{Deserialize, Serialize};

/// Error body returned by the API on non-2xx responses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Pagination links attached to list responses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Links {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<Pages>,
}

/// Page URLs of a paginated list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pages {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
}

impl Links {
    /// Whether the list has a page after the current one
    pub fn has_next(&self) -> bool {
        self.pages
            .as_ref()
            .and_then(|p| p.next.as_deref())
            .is_some_and(|next| !next.is_empty())
    }
}

/// List metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub total: u64,
}
