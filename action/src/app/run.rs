//! Step entry points: wire inputs, context and client into the deployer

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use apps_api::App;
use colored::Colorize;
use tracing::{debug, info};

use crate::app::options::{DeleteInputs, DeployInputs};
use crate::deploy::delete::{self, Deleter};
use crate::deploy::deployer::{self, Deployer};
use crate::deploy::poller::ShutdownSignal;
use crate::errors::{DeployerError, ResultExt};
use crate::github::action::{Action, Reporter};
use crate::github::context::GitHubContext;
use crate::http::apps::AppsService;
use crate::http::client::HttpClient;

/// Run the deploy mode
pub async fn run_deploy(
    action: Arc<Action>,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), DeployerError> {
    let inputs = DeployInputs::from_action(&action)?;
    let ctx = GitHubContext::from_action(&action);
    debug!("Running in {:?}", ctx);

    let preview = if inputs.deploy_pr_preview {
        Some(ctx.preview_target()?)
    } else {
        None
    };

    let client = HttpClient::new(&inputs.api.api_url, inputs.api.token.clone())?;
    let apps: Arc<dyn AppsService> = Arc::new(client);
    let options = deployer::Options {
        spec_location: inputs.app_spec_location.clone(),
        app_name: inputs.app_name.clone(),
        preview,
        print_build_logs: inputs.print_build_logs,
        print_deploy_logs: inputs.print_deploy_logs,
        ..Default::default()
    };
    let deployer = Deployer::new(apps, action.clone(), options)?;

    let result = deployer.deploy(with_deadline(shutdown_signal, inputs.timeout)).await;
    publish_app(&*action, &result)?;

    let app = result.context("failed to deploy")?;
    action.info(&format!("{} {}", "live URL:".green().bold(), app.live_url));
    Ok(())
}

/// Run the delete mode
pub async fn run_delete(action: Arc<Action>) -> Result<(), DeployerError> {
    let inputs = DeleteInputs::from_action(&action)?;

    let preview = if inputs.from_pr_preview {
        Some(GitHubContext::from_action(&action).preview_target()?)
    } else {
        None
    };

    let client = HttpClient::new(&inputs.api.api_url, inputs.api.token.clone())?;
    let apps: Arc<dyn AppsService> = Arc::new(client);
    let options = delete::Options {
        app_id: inputs.app_id.clone(),
        app_name: inputs.app_name.clone(),
        preview,
    };

    let deleted = Deleter::new(apps, action.clone(), options)
        .delete()
        .await
        .context("failed to delete app")?;
    if let Some(app) = deleted {
        info!("Deleted app {:?}", app.spec.name);
    }
    Ok(())
}

/// Emit the `app` output whenever an app was obtained, failed runs included
fn publish_app(
    reporter: &dyn Reporter,
    result: &Result<App, DeployerError>,
) -> Result<(), DeployerError> {
    let app = match result {
        Ok(app) => Some(app),
        Err(e) => e.app(),
    };
    if let Some(app) = app {
        let app_json = serde_json::to_string(app).context("failed to marshal app")?;
        reporter.set_output("app", &app_json)?;
    }
    Ok(())
}

/// Combine the shutdown signal with an optional deadline
fn with_deadline(
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
    timeout: Option<Duration>,
) -> ShutdownSignal {
    Box::pin(async move {
        match timeout {
            Some(timeout) => {
                tokio::select! {
                    _ = shutdown_signal => {}
                    _ = tokio::time::sleep(timeout) => {
                        info!("Timeout ({:?}) reached", timeout);
                    }
                }
            }
            None => shutdown_signal.await,
        }
    })
}
