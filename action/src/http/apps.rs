//! App Platform API operations

use apps_api::{
    App, AppCreateRequest, AppLogType, AppLogs, AppResponse, AppSpec, AppUpdateRequest,
    AppsResponse, Deployment, DeploymentResponse, DeploymentsResponse,
};
use async_trait::async_trait;
use tracing::debug;

use crate::errors::{DeployerError, ResultExt};
use crate::http::client::HttpClient;

/// Largest page size the apps list endpoint accepts
const APPS_PAGE_SIZE: u32 = 200;

/// Platform operations used by the deployer, behind a trait for testability
#[async_trait]
pub trait AppsService: Send + Sync {
    /// List every app in the account
    async fn list_apps(&self) -> Result<Vec<App>, DeployerError>;

    async fn create_app(&self, spec: &AppSpec) -> Result<App, DeployerError>;

    async fn update_app(&self, app_id: &str, spec: &AppSpec) -> Result<App, DeployerError>;

    async fn get_app(&self, app_id: &str) -> Result<App, DeployerError>;

    async fn delete_app(&self, app_id: &str) -> Result<(), DeployerError>;

    /// List deployments of an app, most recent first
    async fn list_deployments(&self, app_id: &str) -> Result<Vec<Deployment>, DeployerError>;

    async fn get_deployment(
        &self,
        app_id: &str,
        deployment_id: &str,
    ) -> Result<Deployment, DeployerError>;

    /// Get the historic log descriptor of a deployment. Fails with a 400
    /// `ApiError` when the phase for `log_type` was skipped or never reached.
    async fn get_logs(
        &self,
        app_id: &str,
        deployment_id: &str,
        log_type: AppLogType,
    ) -> Result<AppLogs, DeployerError>;
}

#[async_trait]
impl AppsService for HttpClient {
    async fn list_apps(&self) -> Result<Vec<App>, DeployerError> {
        let mut apps = Vec::new();
        let mut page = 1u32;

        loop {
            let response: AppsResponse = self
                .get_query("/v2/apps", &[("page", page), ("per_page", APPS_PAGE_SIZE)])
                .await?;
            debug!("Listed apps page {} ({} apps)", page, response.apps.len());

            let exhausted = response.apps.is_empty() || !response.links.has_next();
            apps.extend(response.apps);
            if exhausted {
                return Ok(apps);
            }
            page += 1;
        }
    }

    async fn create_app(&self, spec: &AppSpec) -> Result<App, DeployerError> {
        let request = AppCreateRequest { spec: spec.clone() };
        let response: AppResponse = self.post("/v2/apps", &request).await?;
        Ok(response.app)
    }

    async fn update_app(&self, app_id: &str, spec: &AppSpec) -> Result<App, DeployerError> {
        let request = AppUpdateRequest { spec: spec.clone() };
        let path = format!("/v2/apps/{}", app_id);
        let response: AppResponse = self.put(&path, &request).await?;
        Ok(response.app)
    }

    async fn get_app(&self, app_id: &str) -> Result<App, DeployerError> {
        let path = format!("/v2/apps/{}", app_id);
        let response: AppResponse = self.get(&path).await?;
        Ok(response.app)
    }

    async fn delete_app(&self, app_id: &str) -> Result<(), DeployerError> {
        let path = format!("/v2/apps/{}", app_id);
        self.delete(&path).await
    }

    async fn list_deployments(&self, app_id: &str) -> Result<Vec<Deployment>, DeployerError> {
        let path = format!("/v2/apps/{}/deployments", app_id);
        let response: DeploymentsResponse = self.get(&path).await?;
        Ok(response.deployments)
    }

    async fn get_deployment(
        &self,
        app_id: &str,
        deployment_id: &str,
    ) -> Result<Deployment, DeployerError> {
        let path = format!("/v2/apps/{}/deployments/{}", app_id, deployment_id);
        let response: DeploymentResponse = self.get(&path).await?;
        Ok(response.deployment)
    }

    async fn get_logs(
        &self,
        app_id: &str,
        deployment_id: &str,
        log_type: AppLogType,
    ) -> Result<AppLogs, DeployerError> {
        let path = format!("/v2/apps/{}/deployments/{}/logs", app_id, deployment_id);
        self.get_query(&path, &[("type", log_type.as_str()), ("follow", "true")])
            .await
    }
}

/// Find the app whose current spec carries the given name
pub async fn find_app_by_name<A>(apps: &A, name: &str) -> Result<Option<App>, DeployerError>
where
    A: AppsService + ?Sized,
{
    let all = apps.list_apps().await.context("failed to list apps")?;
    Ok(all.into_iter().find(|a| a.spec.name == name))
}
