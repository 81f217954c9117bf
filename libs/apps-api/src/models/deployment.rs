use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::{Links, Meta};

/// One rollout attempt of an app
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub phase: DeploymentPhase,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cause: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Coarse deployment status
///
/// Phases this crate does not know decode to `Other` with the wire value
/// kept, so they still show up verbatim in reports. They are never terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum DeploymentPhase {
    #[default]
    Unknown,
    PendingBuild,
    Building,
    PendingDeploy,
    Deploying,
    Active,
    Superseded,
    Error,
    Canceled,
    Other(String),
}

impl DeploymentPhase {
    /// Parse a wire value
    pub fn from_wire(value: &str) -> Self {
        match value {
            "UNKNOWN" | "" => DeploymentPhase::Unknown,
            "PENDING_BUILD" => DeploymentPhase::PendingBuild,
            "BUILDING" => DeploymentPhase::Building,
            "PENDING_DEPLOY" => DeploymentPhase::PendingDeploy,
            "DEPLOYING" => DeploymentPhase::Deploying,
            "ACTIVE" => DeploymentPhase::Active,
            "SUPERSEDED" => DeploymentPhase::Superseded,
            "ERROR" => DeploymentPhase::Error,
            "CANCELED" => DeploymentPhase::Canceled,
            other => DeploymentPhase::Other(other.to_string()),
        }
    }

    /// Whether no further transitions happen after this phase
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DeploymentPhase::Active
                | DeploymentPhase::Error
                | DeploymentPhase::Canceled
                | DeploymentPhase::Superseded
        )
    }

    /// Wire representation
    pub fn as_str(&self) -> &str {
        match self {
            DeploymentPhase::Unknown => "UNKNOWN",
            DeploymentPhase::PendingBuild => "PENDING_BUILD",
            DeploymentPhase::Building => "BUILDING",
            DeploymentPhase::PendingDeploy => "PENDING_DEPLOY",
            DeploymentPhase::Deploying => "DEPLOYING",
            DeploymentPhase::Active => "ACTIVE",
            DeploymentPhase::Superseded => "SUPERSEDED",
            DeploymentPhase::Error => "ERROR",
            DeploymentPhase::Canceled => "CANCELED",
            DeploymentPhase::Other(raw) => raw,
        }
    }
}

impl fmt::Display for DeploymentPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DeploymentPhase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DeploymentPhase {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(DeploymentPhase::from_wire(&raw))
    }
}

/// Single deployment envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentResponse {
    pub deployment: Deployment,
}

/// Deployment list envelope, most recent first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentsResponse {
    #[serde(default)]
    pub deployments: Vec<Deployment>,

    #[serde(default)]
    pub links: Links,

    #[serde(default)]
    pub meta: Meta,
}

/// Log stream kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppLogType {
    Build,
    Deploy,
    Run,
}

impl AppLogType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppLogType::Build => "BUILD",
            AppLogType::Deploy => "DEPLOY",
            AppLogType::Run => "RUN",
        }
    }
}

impl fmt::Display for AppLogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log descriptor for one (deployment, log type) pair
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppLogs {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub live_url: String,

    /// Pre-signed segment URLs in time order
    #[serde(default)]
    pub historic_urls: Vec<String>,
}
