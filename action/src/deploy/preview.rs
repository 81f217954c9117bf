//! Spec rewriting for pull request previews

use apps_api::AppSpec;
use tracing::debug;

use crate::deploy::naming::generate_app_name;

/// Repository coordinates and ref a preview is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewTarget {
    pub owner: String,
    pub repo: String,

    /// Ref the app name is derived from
    pub ref_name: String,

    /// Branch same-repository components are pointed at
    pub branch: String,
}

impl PreviewTarget {
    /// Target building `ref_name` itself
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        ref_name: impl Into<String>,
    ) -> Self {
        let ref_name = ref_name.into();
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: ref_name.clone(),
            ref_name,
        }
    }

    /// Build from `branch` while naming the app after `ref_name`
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// `owner/repo`
    pub fn repository(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Name of the preview app
    pub fn app_name(&self) -> String {
        generate_app_name(&self.owner, &self.repo, &self.ref_name)
    }
}

/// Make `spec` safe to deploy as an isolated preview of `target`.
///
/// Renames the app, drops domains and alerts, and points every component
/// sourced from the target repository at the preview branch with
/// deploy-on-push off. Components from other repositories are untouched.
pub fn sanitize_spec(spec: &mut AppSpec, target: &PreviewTarget) {
    spec.name = target.app_name();
    spec.domains.clear();
    spec.alerts.clear();

    let repository = target.repository();
    for component in spec.buildable_components_mut() {
        let Some(github) = component.github.as_mut() else {
            continue;
        };
        if github.repo != repository {
            debug!("Leaving {} on {}", component.name, github.repo);
            continue;
        }
        // Rollouts are kicked by the pipeline only.
        github.deploy_on_push = false;
        github.branch = target.branch.clone();
    }
}
