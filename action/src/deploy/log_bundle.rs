//! Historic deployment log assembly

use std::time::Duration;

use apps_api::AppLogType;
use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::errors::{DeployerError, ResultExt};
use crate::http::apps::AppsService;

/// Log fetcher options
#[derive(Debug, Clone)]
pub struct Options {
    /// Segments downloaded at once; output order never depends on it
    pub concurrency: usize,

    /// Per segment request timeout
    pub timeout: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            concurrency: 4,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Downloads and concatenates historic log segments
pub struct LogFetcher {
    client: Client,
    concurrency: usize,
}

impl LogFetcher {
    /// Create a fetcher with its own unauthenticated HTTP client. Segment URLs
    /// are pre-signed, so no credentials are ever attached.
    pub fn new(options: &Options) -> Result<Self, DeployerError> {
        let client = Client::builder().timeout(options.timeout).build()?;
        Ok(Self {
            client,
            concurrency: options.concurrency.max(1),
        })
    }

    /// Fetch all `log_type` logs of a deployment.
    ///
    /// A phase that was skipped or never reached yields an empty bundle rather
    /// than an error.
    pub async fn fetch(
        &self,
        apps: &dyn AppsService,
        app_id: &str,
        deployment_id: &str,
        log_type: AppLogType,
    ) -> Result<Vec<u8>, DeployerError> {
        let context = format!("failed to get {} logs", log_type.as_str().to_lowercase());

        let logs = match apps.get_logs(app_id, deployment_id, log_type).await {
            Ok(logs) => logs,
            Err(e) if e.is_not_reached() => {
                debug!("No {} logs for deployment {}: {}", log_type, deployment_id, e);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e).context(context),
        };

        self.fetch_historic(&logs.historic_urls).await.context(context)
    }

    /// Download `urls` and join the bodies in list order. Any failed segment
    /// fails the whole bundle.
    pub async fn fetch_historic(&self, urls: &[String]) -> Result<Vec<u8>, DeployerError> {
        let segments: Vec<Vec<u8>> = stream::iter(urls)
            .map(|url| self.fetch_segment(url))
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        Ok(segments.concat())
    }

    async fn fetch_segment(&self, url: &str) -> Result<Vec<u8>, DeployerError> {
        let parsed = Url::parse(url)
            .map_err(|e| DeployerError::Internal(format!("invalid log URL: {}", e)))?;

        let response = self.client.get(parsed).send().await?.error_for_status()?;
        let body = response.bytes().await?;
        debug!("Fetched log segment ({} bytes)", body.len());
        Ok(body.to_vec())
    }
}
