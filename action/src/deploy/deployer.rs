//! Deployment orchestration
//!
//! Resolves the spec, creates or updates the app, follows the deployment that
//! the change enqueued to a terminal phase, publishes its logs and finally
//! waits for the app to be routable.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use apps_api::{App, AppLogType, AppSpec, DeploymentPhase};
use tracing::{debug, info, warn};

use crate::deploy::log_bundle::{self, LogFetcher};
use crate::deploy::naming::MAX_APP_NAME_LEN;
use crate::deploy::poller::{
    until_shutdown, wait_for_app_live_url, wait_for_deployment_terminal, ShutdownSignal,
    DEFAULT_POLL_INTERVAL,
};
use crate::deploy::preview::{sanitize_spec, PreviewTarget};
use crate::errors::{DeployerError, ResultExt};
use crate::github::action::Reporter;
use crate::http::apps::{find_app_by_name, AppsService};

/// Where the spec is read from when no app name is given
pub const DEFAULT_SPEC_LOCATION: &str = ".do/app.yaml";

/// Deployer options
#[derive(Debug, Clone)]
pub struct Options {
    /// Spec file, used unless `app_name` is set
    pub spec_location: PathBuf,

    /// Redeploy the current spec of this existing app instead of reading a file
    pub app_name: Option<String>,

    /// Deploy an isolated preview for this target
    pub preview: Option<PreviewTarget>,

    /// Echo build logs into the job log
    pub print_build_logs: bool,

    /// Echo deploy logs into the job log
    pub print_deploy_logs: bool,

    /// Delay between status polls
    pub poll_interval: Duration,

    /// Historic log download settings
    pub logs: log_bundle::Options,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            spec_location: PathBuf::from(DEFAULT_SPEC_LOCATION),
            app_name: None,
            preview: None,
            print_build_logs: false,
            print_deploy_logs: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
            logs: log_bundle::Options::default(),
        }
    }
}

/// Drives one app deployment to completion
pub struct Deployer {
    apps: Arc<dyn AppsService>,
    reporter: Arc<dyn Reporter>,
    log_fetcher: LogFetcher,
    options: Options,
}

impl Deployer {
    /// Create a new deployer
    pub fn new(
        apps: Arc<dyn AppsService>,
        reporter: Arc<dyn Reporter>,
        options: Options,
    ) -> Result<Self, DeployerError> {
        let log_fetcher = LogFetcher::new(&options.logs)?;
        Ok(Self {
            apps,
            reporter,
            log_fetcher,
            options,
        })
    }

    /// Deploy and wait for the app to go live.
    ///
    /// When the deployment settles in any phase but ACTIVE the error is a
    /// `DeploymentFailed` carrying the app as last seen. Any other error
    /// raised once the app was submitted carries it too (see
    /// `DeployerError::app`). `shutdown` aborts the run with a `Cancelled`
    /// error, including requests in flight.
    pub async fn deploy(&self, mut shutdown: ShutdownSignal) -> Result<App, DeployerError> {
        let mut spec = self.resolve_spec().await?;

        if let Some(target) = &self.options.preview {
            sanitize_spec(&mut spec, target);
            self.reporter.info(&format!("app name: {}", spec.name));
        }
        validate_spec(&spec)?;

        self.reporter
            .info(&format!("start deployment of app {:?}", spec.name));
        let app = self.create_or_update(&spec).await?;

        self.follow(&app, &mut shutdown)
            .await
            .map_err(|e| e.with_app(&app))
    }

    /// Drive the deployment enqueued for `app` to the end
    async fn follow(&self, app: &App, shutdown: &mut ShutdownSignal) -> Result<App, DeployerError> {
        let deployment_id = until_shutdown(
            shutdown,
            "looking up the deployment",
            self.triggered_deployment_id(app),
        )
        .await?;
        debug!("Following deployment {} of app {}", deployment_id, app.id);

        self.reporter.info("wait for deployment to finish");
        let deployment = wait_for_deployment_terminal(
            self.apps.as_ref(),
            self.reporter.as_ref(),
            &app.id,
            &deployment_id,
            self.options.poll_interval,
            shutdown,
        )
        .await
        .context("failed to wait for deployment to finish")?;

        until_shutdown(
            shutdown,
            "fetching deployment logs",
            self.publish_logs(&app.id, &deployment_id),
        )
        .await?;

        if deployment.phase != DeploymentPhase::Active {
            let refreshed =
                until_shutdown(shutdown, "refreshing the app", self.apps.get_app(&app.id)).await;
            let app = match refreshed {
                Ok(latest) => latest,
                Err(e) => {
                    warn!("Failed to refresh app {} after failed deployment: {}", app.id, e);
                    app.clone()
                }
            };
            return Err(DeployerError::DeploymentFailed {
                phase: deployment.phase,
                app: Box::new(app),
            });
        }

        let app = wait_for_app_live_url(
            self.apps.as_ref(),
            &app.id,
            self.options.poll_interval,
            shutdown,
        )
        .await
        .context("failed to wait for app to have a live URL")?;

        info!("App {} is live at {}", app.id, app.live_url);
        Ok(app)
    }

    /// Spec of the named app, or the spec file
    async fn resolve_spec(&self) -> Result<AppSpec, DeployerError> {
        if let Some(name) = &self.options.app_name {
            let app = find_app_by_name(self.apps.as_ref(), name)
                .await?
                .ok_or_else(|| DeployerError::NotFound(format!("app {:?}", name)))
                .context("failed to get app spec")?;
            return Ok(app.spec);
        }

        read_spec_file(&self.options.spec_location)
            .await
            .context("failed to get app spec content")
    }

    async fn create_or_update(&self, spec: &AppSpec) -> Result<App, DeployerError> {
        match find_app_by_name(self.apps.as_ref(), &spec.name).await? {
            None => {
                info!("Creating app {:?}", spec.name);
                self.apps
                    .create_app(spec)
                    .await
                    .context("failed to create app")
            }
            Some(existing) => {
                info!("Updating app {:?} ({})", spec.name, existing.id);
                self.apps
                    .update_app(&existing.id, spec)
                    .await
                    .context("failed to update app")
            }
        }
    }

    /// Deployment enqueued by the last create/update. Uses the id the platform
    /// returned when it did, else assumes the most recent deployment is ours.
    async fn triggered_deployment_id(&self, app: &App) -> Result<String, DeployerError> {
        if let Some(id) = app.spawned_deployment_id() {
            return Ok(id.to_string());
        }

        let deployments = self
            .apps
            .list_deployments(&app.id)
            .await
            .context("failed to list deployments")?;
        deployments
            .into_iter()
            .next()
            .map(|d| d.id)
            .ok_or_else(|| DeployerError::NotFound(format!("no deployments for app {}", app.id)))
    }

    /// Fetch build and deploy logs, echoing and publishing non-empty bundles
    async fn publish_logs(&self, app_id: &str, deployment_id: &str) -> Result<(), DeployerError> {
        let kinds = [
            (AppLogType::Build, "build", self.options.print_build_logs),
            (AppLogType::Deploy, "deploy", self.options.print_deploy_logs),
        ];

        for (log_type, label, print) in kinds {
            let logs = self
                .log_fetcher
                .fetch(self.apps.as_ref(), app_id, deployment_id, log_type)
                .await?;
            if logs.is_empty() {
                continue;
            }

            let text = String::from_utf8_lossy(&logs);
            if print {
                self.reporter.group(&format!("{} logs", label));
                for line in text.lines() {
                    self.reporter.info(line);
                }
                self.reporter.end_group();
            }
            self.reporter
                .set_output(&format!("{}_logs", label), &text)?;
        }
        Ok(())
    }
}

/// Read and parse a YAML (or JSON) spec file
pub async fn read_spec_file(path: &std::path::Path) -> Result<AppSpec, DeployerError> {
    let content = tokio::fs::read(path).await?;
    let spec = serde_yaml_ng::from_slice(&content)?;
    Ok(spec)
}

/// Check a spec can be submitted
pub fn validate_spec(spec: &AppSpec) -> Result<(), DeployerError> {
    if spec.name.is_empty() {
        return Err(DeployerError::SpecError("app name is empty".to_string()));
    }
    if spec.name.chars().count() > MAX_APP_NAME_LEN {
        return Err(DeployerError::SpecError(format!(
            "app name {:?} is longer than {} characters",
            spec.name, MAX_APP_NAME_LEN
        )));
    }
    Ok(())
}
