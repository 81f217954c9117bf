use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declarative description of an app
///
/// Only the fields the action inspects or rewrites are typed. Everything else
/// (envs, region, databases, ingress, ...) is carried in `extra` so an
/// update sends back exactly what was read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSpec {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<ComponentSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub static_sites: Vec<ComponentSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub workers: Vec<ComponentSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub jobs: Vec<ComponentSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<ComponentSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub domains: Vec<DomainSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alerts: Vec<AlertSpec>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AppSpec {
    /// All buildable components: services, static sites, workers, jobs,
    /// then functions
    pub fn buildable_components(&self) -> impl Iterator<Item = &ComponentSpec> {
        self.services
            .iter()
            .chain(self.static_sites.iter())
            .chain(self.workers.iter())
            .chain(self.jobs.iter())
            .chain(self.functions.iter())
    }

    /// Mutable access to all buildable components
    pub fn buildable_components_mut(&mut self) -> impl Iterator<Item = &mut ComponentSpec> {
        self.services
            .iter_mut()
            .chain(self.static_sites.iter_mut())
            .chain(self.workers.iter_mut())
            .chain(self.jobs.iter_mut())
            .chain(self.functions.iter_mut())
    }
}

/// A buildable component: service, static site, worker, job or function
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentSpec {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<GitHubSourceSpec>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// GitHub source reference of a component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitHubSourceSpec {
    /// Repository as `owner/repo`
    #[serde(default)]
    pub repo: String,

    #[serde(default)]
    pub branch: String,

    #[serde(default)]
    pub deploy_on_push: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Domain binding
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainSpec {
    #[serde(default)]
    pub domain: String,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub domain_type: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// App level alert
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertSpec {
    #[serde(default)]
    pub rule: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /v2/apps`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppCreateRequest {
    pub spec: AppSpec,
}

/// Body of `PUT /v2/apps/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppUpdateRequest {
    pub spec: AppSpec,
}
