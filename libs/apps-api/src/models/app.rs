use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{AppSpec, Deployment, Links, Meta};

/// An app as materialized by the platform
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct App {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub spec: AppSpec,

    /// Empty until the first deployment is live and routed
    #[serde(default)]
    pub live_url: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_ingress: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_deployment: Option<Deployment>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_deployment: Option<Deployment>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_progress_deployment: Option<Deployment>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl App {
    /// Id of the deployment the last create/update enqueued, if the platform
    /// reported one
    pub fn spawned_deployment_id(&self) -> Option<&str> {
        self.pending_deployment
            .as_ref()
            .or(self.in_progress_deployment.as_ref())
            .map(|d| d.id.as_str())
            .filter(|id| !id.is_empty())
    }
}

/// Single app envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppResponse {
    pub app: App,
}

/// App list envelope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppsResponse {
    #[serde(default)]
    pub apps: Vec<App>,

    #[serde(default)]
    pub links: Links,

    #[serde(default)]
    pub meta: Meta,
}
