//! Error types for the app action

use apps_api::{App, DeploymentPhase};
use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the app action
#[derive(Error, Debug)]
pub enum DeployerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    ApiError { status: StatusCode, message: String },

    #[error("Input error: {0}")]
    InputError(String),

    #[error("Invalid app spec: {0}")]
    SpecError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<DeployerError>,
    },

    /// The deployment settled in a phase other than ACTIVE. Carries the app
    /// as last seen so callers can still report it.
    #[error("deployment failed: {phase}")]
    DeploymentFailed { phase: DeploymentPhase, app: Box<App> },

    /// Any failure after the app was created or updated, with the app as
    /// last seen
    #[error("{source}")]
    WithApp {
        #[source]
        source: Box<DeployerError>,
        app: Box<App>,
    },

    #[error("Cancelled while {0}")]
    Cancelled(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DeployerError {
    /// Innermost error below any context wrappers
    pub fn root(&self) -> &DeployerError {
        match self {
            DeployerError::Context { source, .. } | DeployerError::WithApp { source, .. } => {
                source.root()
            }
            other => other,
        }
    }

    /// Whether the API rejected a log request because the phase was skipped or
    /// never reached
    pub fn is_not_reached(&self) -> bool {
        matches!(
            self.root(),
            DeployerError::ApiError { status, .. } if *status == StatusCode::BAD_REQUEST
        )
    }

    pub fn is_not_found(&self) -> bool {
        match self.root() {
            DeployerError::NotFound(_) => true,
            DeployerError::ApiError { status, .. } => *status == StatusCode::NOT_FOUND,
            _ => false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.root(), DeployerError::Cancelled(_))
    }

    /// Last known app, if the error happened after the app was submitted
    pub fn app(&self) -> Option<&App> {
        match self {
            DeployerError::WithApp { app, .. } | DeployerError::DeploymentFailed { app, .. } => {
                Some(app)
            }
            DeployerError::Context { source, .. } => source.app(),
            _ => None,
        }
    }

    /// Attach `app` unless the error already carries one
    pub fn with_app(self, app: &App) -> Self {
        if self.app().is_some() {
            return self;
        }
        DeployerError::WithApp {
            source: Box::new(self),
            app: Box::new(app.clone()),
        }
    }
}

/// Attach operation context to an error
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T, DeployerError>;
}

impl<T, E: Into<DeployerError>> ResultExt<T> for Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T, DeployerError> {
        self.map_err(|e| DeployerError::Context {
            context: context.into(),
            source: Box::new(e.into()),
        })
    }
}
