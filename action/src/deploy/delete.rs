//! App removal

use std::sync::Arc;

use apps_api::App;
use tracing::info;

use crate::deploy::preview::PreviewTarget;
use crate::errors::{DeployerError, ResultExt};
use crate::github::action::Reporter;
use crate::http::apps::{find_app_by_name, AppsService};

/// Which app to delete. Exactly one selector is allowed.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub app_id: Option<String>,
    pub app_name: Option<String>,

    /// Delete the preview app of this target
    pub preview: Option<PreviewTarget>,
}

enum Selector<'a> {
    Id(&'a str),
    Name(&'a str),
    Preview(&'a PreviewTarget),
}

impl Options {
    fn selector(&self) -> Result<Selector<'_>, DeployerError> {
        match (&self.app_id, &self.app_name, &self.preview) {
            (Some(id), None, None) => Ok(Selector::Id(id)),
            (None, Some(name), None) => Ok(Selector::Name(name)),
            (None, None, Some(target)) => Ok(Selector::Preview(target)),
            _ => Err(DeployerError::InputError(
                "exactly one of app_id, app_name or from_pr_preview must be set".to_string(),
            )),
        }
    }
}

/// Deletes one app
pub struct Deleter {
    apps: Arc<dyn AppsService>,
    reporter: Arc<dyn Reporter>,
    options: Options,
}

impl Deleter {
    pub fn new(apps: Arc<dyn AppsService>, reporter: Arc<dyn Reporter>, options: Options) -> Self {
        Self {
            apps,
            reporter,
            options,
        }
    }

    /// Delete the selected app. Returns it when it was looked up by name.
    ///
    /// A preview app that does not exist is not an error: there is nothing to
    /// clean up.
    pub async fn delete(&self) -> Result<Option<App>, DeployerError> {
        let (app_id, app) = match self.options.selector()? {
            Selector::Id(id) => (id.to_string(), None),
            Selector::Name(name) => {
                let app = find_app_by_name(self.apps.as_ref(), name)
                    .await?
                    .ok_or_else(|| DeployerError::NotFound(format!("app {:?}", name)))
                    .context("failed to find app")?;
                (app.id.clone(), Some(app))
            }
            Selector::Preview(target) => {
                let name = target.app_name();
                match find_app_by_name(self.apps.as_ref(), &name).await? {
                    Some(app) => (app.id.clone(), Some(app)),
                    None => {
                        self.reporter.info(&format!(
                            "preview app {:?} does not exist, nothing to delete",
                            name
                        ));
                        return Ok(None);
                    }
                }
            }
        };

        info!("Deleting app {}", app_id);
        self.apps
            .delete_app(&app_id)
            .await
            .context("failed to delete app")?;
        self.reporter.info(&format!("deleted app {}", app_id));
        Ok(app)
    }
}
