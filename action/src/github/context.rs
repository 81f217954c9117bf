//! Workflow run context

use crate::deploy::preview::PreviewTarget;
use crate::errors::DeployerError;
use crate::github::action::Action;

/// Repository and ref information of the triggering workflow run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitHubContext {
    /// `owner/repo`
    pub repository: String,

    /// Short ref name, e.g. `main` or `42/merge`
    pub ref_name: String,

    /// Source branch of a pull request; empty for other events
    pub head_ref: String,

    pub event_name: String,
}

impl GitHubContext {
    /// Read the context from the step environment
    pub fn from_action(action: &Action) -> Self {
        let var = |key: &str| action.getenv(key).unwrap_or_default();
        Self {
            repository: var("GITHUB_REPOSITORY"),
            ref_name: var("GITHUB_REF_NAME"),
            head_ref: var("GITHUB_HEAD_REF"),
            event_name: var("GITHUB_EVENT_NAME"),
        }
    }

    /// Split the repository into owner and name
    pub fn repo(&self) -> Result<(&str, &str), DeployerError> {
        match self.repository.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => Ok((owner, repo)),
            _ => Err(DeployerError::InputError(format!(
                "GITHUB_REPOSITORY {:?} is not of the form owner/repo",
                self.repository
            ))),
        }
    }

    /// Preview target of this run. Pull requests build their head branch.
    pub fn preview_target(&self) -> Result<PreviewTarget, DeployerError> {
        let (owner, repo) = self.repo()?;
        if self.ref_name.is_empty() {
            return Err(DeployerError::InputError(
                "GITHUB_REF_NAME is not set".to_string(),
            ));
        }

        let target = PreviewTarget::new(owner, repo, self.ref_name.clone());
        if self.head_ref.is_empty() {
            Ok(target)
        } else {
            Ok(target.with_branch(self.head_ref.clone()))
        }
    }
}
