//! Polling loops that wait on the platform

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use apps_api::{App, Deployment};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::debug;

use crate::deploy::fsm::PhaseTracker;
use crate::errors::{DeployerError, ResultExt};
use crate::github::action::Reporter;
use crate::http::apps::AppsService;

/// Resolves when the caller wants polling to stop
pub type ShutdownSignal = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Default delay between polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

const WAITING_FOR_DEPLOYMENT: &str = "waiting for the deployment to finish";
const WAITING_FOR_LIVE_URL: &str = "waiting for the app to have a live URL";

/// A signal that never fires
pub fn never() -> ShutdownSignal {
    Box::pin(std::future::pending::<()>())
}

fn ticker(period: Duration) -> Interval {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Wait for the next tick unless shutdown fires first
async fn next_tick(
    ticker: &mut Interval,
    shutdown: &mut ShutdownSignal,
    waiting_for: &str,
) -> Result<(), DeployerError> {
    tokio::select! {
        biased;
        _ = shutdown.as_mut() => Err(DeployerError::Cancelled(waiting_for.to_string())),
        _ = ticker.tick() => Ok(()),
    }
}

/// Run `work` unless shutdown fires first. The request in flight is dropped
/// on shutdown.
pub async fn until_shutdown<T, F>(
    shutdown: &mut ShutdownSignal,
    waiting_for: &str,
    work: F,
) -> Result<T, DeployerError>
where
    F: Future<Output = Result<T, DeployerError>>,
{
    tokio::select! {
        biased;
        _ = shutdown.as_mut() => Err(DeployerError::Cancelled(waiting_for.to_string())),
        result = work => result,
    }
}

/// Poll a deployment until it reaches a terminal phase, reporting every
/// phase change along the way
pub async fn wait_for_deployment_terminal(
    apps: &dyn AppsService,
    reporter: &dyn Reporter,
    app_id: &str,
    deployment_id: &str,
    interval: Duration,
    shutdown: &mut ShutdownSignal,
) -> Result<Deployment, DeployerError> {
    let mut ticker = ticker(interval);
    let mut tracker = PhaseTracker::new();

    loop {
        let deployment = until_shutdown(
            shutdown,
            WAITING_FOR_DEPLOYMENT,
            apps.get_deployment(app_id, deployment_id),
        )
        .await
        .context("failed to get deployment")?;

        let (next, transition) = tracker.observe(deployment.phase.clone());
        tracker = next;
        if let Some(transition) = transition {
            reporter.info(&format!("deployment is in phase: {}", transition.to));
        }

        if tracker.is_settled() {
            debug!(
                "Deployment {} settled after {} polls",
                deployment_id,
                tracker.observations()
            );
            return Ok(deployment);
        }

        next_tick(&mut ticker, shutdown, WAITING_FOR_DEPLOYMENT).await?;
    }
}

/// Poll an app until it reports a live URL
pub async fn wait_for_app_live_url(
    apps: &dyn AppsService,
    app_id: &str,
    interval: Duration,
    shutdown: &mut ShutdownSignal,
) -> Result<App, DeployerError> {
    let mut ticker = ticker(interval);

    loop {
        let app = until_shutdown(shutdown, WAITING_FOR_LIVE_URL, apps.get_app(app_id))
            .await
            .context("failed to get app")?;
        if !app.live_url.is_empty() {
            return Ok(app);
        }
        debug!("App {} has no live URL yet", app_id);

        next_tick(&mut ticker, shutdown, WAITING_FOR_LIVE_URL).await?;
    }
}
