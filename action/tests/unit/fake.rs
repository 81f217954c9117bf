//! Test doubles: an in-memory platform and a recording reporter

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use app_action::errors::DeployerError;
use app_action::github::action::Reporter;
use app_action::http::apps::AppsService;
use apps_api::{App, AppLogType, AppLogs, AppSpec, Deployment, DeploymentPhase};
use async_trait::async_trait;
use axum::Router;
use reqwest::StatusCode;

/// Log descriptor answer of the fake platform
#[derive(Debug, Clone)]
pub enum FakeLogs {
    Urls(Vec<String>),
    Status(StatusCode),
}

/// Scripted platform state
#[derive(Debug, Default)]
pub struct FakeState {
    pub apps: Vec<App>,

    /// Returned by `list_deployments`
    pub deployments: Vec<Deployment>,

    /// Popped by `get_deployment`; the last one repeats
    pub phases: VecDeque<DeploymentPhase>,

    /// Popped by `get_app`; the last one repeats
    pub live_urls: VecDeque<String>,

    /// Attached as `pending_deployment` to created/updated apps
    pub spawned_deployment: Option<String>,

    pub logs: HashMap<AppLogType, FakeLogs>,

    /// Answer delay of `get_deployment` and `get_app`
    pub stall: Option<Duration>,

    /// Operation log, e.g. `create`, `update:app-1`, `get_deployment:dep-1`
    pub calls: Vec<String>,

    pub submitted_specs: Vec<AppSpec>,
}

#[derive(Debug, Default)]
pub struct FakeApps {
    pub state: Mutex<FakeState>,
}

impl FakeApps {
    pub fn new(state: FakeState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn submitted_specs(&self) -> Vec<AppSpec> {
        self.state.lock().unwrap().submitted_specs.clone()
    }

    fn record(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }

    async fn stall(&self) {
        let stall = self.state.lock().unwrap().stall;
        if let Some(delay) = stall {
            tokio::time::sleep(delay).await;
        }
    }
}

fn pop_sticky<T: Clone>(queue: &mut VecDeque<T>) -> Option<T> {
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

fn spawned(state: &FakeState) -> Option<Deployment> {
    state.spawned_deployment.as_ref().map(|id| Deployment {
        id: id.clone(),
        phase: DeploymentPhase::PendingBuild,
        ..Default::default()
    })
}

#[async_trait]
impl AppsService for FakeApps {
    async fn list_apps(&self) -> Result<Vec<App>, DeployerError> {
        self.record("list_apps".to_string());
        Ok(self.state.lock().unwrap().apps.clone())
    }

    async fn create_app(&self, spec: &AppSpec) -> Result<App, DeployerError> {
        self.record("create".to_string());
        let mut state = self.state.lock().unwrap();
        state.submitted_specs.push(spec.clone());
        let app = App {
            id: format!("app-{}", spec.name),
            spec: spec.clone(),
            pending_deployment: spawned(&state),
            ..Default::default()
        };
        state.apps.push(app.clone());
        Ok(app)
    }

    async fn update_app(&self, app_id: &str, spec: &AppSpec) -> Result<App, DeployerError> {
        self.record(format!("update:{app_id}"));
        let mut state = self.state.lock().unwrap();
        state.submitted_specs.push(spec.clone());
        let pending = spawned(&state);
        let app = state
            .apps
            .iter_mut()
            .find(|a| a.id == app_id)
            .ok_or_else(|| DeployerError::NotFound(app_id.to_string()))?;
        app.spec = spec.clone();
        app.pending_deployment = pending;
        Ok(app.clone())
    }

    async fn get_app(&self, app_id: &str) -> Result<App, DeployerError> {
        self.record(format!("get_app:{app_id}"));
        self.stall().await;
        let mut state = self.state.lock().unwrap();
        let live_url = pop_sticky(&mut state.live_urls).unwrap_or_default();
        let app = state
            .apps
            .iter_mut()
            .find(|a| a.id == app_id)
            .ok_or_else(|| DeployerError::NotFound(app_id.to_string()))?;
        app.live_url = live_url;
        Ok(app.clone())
    }

    async fn delete_app(&self, app_id: &str) -> Result<(), DeployerError> {
        self.record(format!("delete:{app_id}"));
        let mut state = self.state.lock().unwrap();
        state.apps.retain(|a| a.id != app_id);
        Ok(())
    }

    async fn list_deployments(&self, app_id: &str) -> Result<Vec<Deployment>, DeployerError> {
        self.record(format!("list_deployments:{app_id}"));
        Ok(self.state.lock().unwrap().deployments.clone())
    }

    async fn get_deployment(
        &self,
        _app_id: &str,
        deployment_id: &str,
    ) -> Result<Deployment, DeployerError> {
        self.record(format!("get_deployment:{deployment_id}"));
        self.stall().await;
        let mut state = self.state.lock().unwrap();
        let phase = pop_sticky(&mut state.phases).unwrap_or_default();
        Ok(Deployment {
            id: deployment_id.to_string(),
            phase,
            ..Default::default()
        })
    }

    async fn get_logs(
        &self,
        _app_id: &str,
        deployment_id: &str,
        log_type: AppLogType,
    ) -> Result<AppLogs, DeployerError> {
        self.record(format!("get_logs:{deployment_id}:{log_type}"));
        let state = self.state.lock().unwrap();
        match state.logs.get(&log_type) {
            None => Ok(AppLogs::default()),
            Some(FakeLogs::Urls(urls)) => Ok(AppLogs {
                historic_urls: urls.clone(),
                ..Default::default()
            }),
            Some(FakeLogs::Status(status)) => Err(DeployerError::ApiError {
                status: *status,
                message: "log request rejected".to_string(),
            }),
        }
    }
}

/// Reporter that keeps everything it is told
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub lines: Mutex<Vec<String>>,
    pub outputs: Mutex<Vec<(String, String)>>,
}

impl RecordingReporter {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn output(&self, key: &str) -> Option<String> {
        self.outputs
            .lock()
            .unwrap()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}

impl Reporter for RecordingReporter {
    fn info(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_string());
    }

    fn group(&self, title: &str) {
        self.lines.lock().unwrap().push(format!("::group::{title}"));
    }

    fn end_group(&self) {
        self.lines.lock().unwrap().push("::endgroup::".to_string());
    }

    fn set_output(&self, key: &str, value: &str) -> Result<(), DeployerError> {
        self.outputs
            .lock()
            .unwrap()
            .push((key.to_string(), value.to_string()));
        Ok(())
    }
}

/// An app whose spec carries `name`
pub fn app(id: &str, name: &str) -> App {
    App {
        id: id.to_string(),
        spec: AppSpec {
            name: name.to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn deployment(id: &str) -> Deployment {
    Deployment {
        id: id.to_string(),
        ..Default::default()
    }
}

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}
