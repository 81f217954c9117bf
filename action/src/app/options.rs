//! Step inputs

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::deploy::deployer::DEFAULT_SPEC_LOCATION;
use crate::errors::DeployerError;
use crate::github::action::Action;
use crate::http::client::DEFAULT_API_URL;

/// Inputs shared by every mode
#[derive(Debug, Clone)]
pub struct ApiInputs {
    /// Platform API token, masked as soon as it is read
    pub token: SecretString,

    /// Platform API endpoint
    pub api_url: String,
}

impl ApiInputs {
    pub fn from_action(action: &Action) -> Result<Self, DeployerError> {
        let token = action.input_as_string("token", true)?;
        action.add_mask(&token);

        let api_url = non_empty(action.input_as_string("api_url", false)?)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self {
            token: SecretString::from(token),
            api_url,
        })
    }
}

/// Inputs of the deploy mode
#[derive(Debug, Clone)]
pub struct DeployInputs {
    pub api: ApiInputs,

    /// Spec file, used when `app_name` is not set
    pub app_spec_location: PathBuf,

    /// Redeploy the current spec of this existing app
    pub app_name: Option<String>,

    pub print_build_logs: bool,

    pub print_deploy_logs: bool,

    /// Deploy an isolated preview of the triggering ref
    pub deploy_pr_preview: bool,

    /// Give up waiting after this long
    pub timeout: Option<Duration>,
}

impl DeployInputs {
    pub fn from_action(action: &Action) -> Result<Self, DeployerError> {
        let api = ApiInputs::from_action(action)?;

        let app_spec_location = non_empty(action.input_as_string("app_spec_location", false)?)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SPEC_LOCATION));

        let timeout = match non_empty(action.input_as_string("timeout", false)?) {
            Some(raw) => Some(parse_timeout(&raw)?),
            None => None,
        };

        Ok(Self {
            api,
            app_spec_location,
            app_name: non_empty(action.input_as_string("app_name", false)?),
            print_build_logs: action.input_as_bool("print_build_logs", false)?,
            print_deploy_logs: action.input_as_bool("print_deploy_logs", false)?,
            deploy_pr_preview: action.input_as_bool("deploy_pr_preview", false)?,
            timeout,
        })
    }
}

/// Inputs of the delete mode
#[derive(Debug, Clone)]
pub struct DeleteInputs {
    pub api: ApiInputs,
    pub app_id: Option<String>,
    pub app_name: Option<String>,

    /// Delete the preview app of the triggering ref
    pub from_pr_preview: bool,
}

impl DeleteInputs {
    pub fn from_action(action: &Action) -> Result<Self, DeployerError> {
        Ok(Self {
            api: ApiInputs::from_action(action)?,
            app_id: non_empty(action.input_as_string("app_id", false)?),
            app_name: non_empty(action.input_as_string("app_name", false)?),
            from_pr_preview: action.input_as_bool("from_pr_preview", false)?,
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Timeout in whole seconds
fn parse_timeout(raw: &str) -> Result<Duration, DeployerError> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(DeployerError::InputError(format!(
            "failed to parse \"timeout\" as a positive number of seconds: {:?}",
            raw
        ))),
    }
}
