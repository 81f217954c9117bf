//! Workflow command IO: inputs, outputs and console commands

use std::fs::OpenOptions;
use std::io::Write;

use tracing::debug;
use uuid::Uuid;

use crate::errors::DeployerError;

/// Console and output sink the deployer reports to
pub trait Reporter: Send + Sync {
    /// Print a line to the job log
    fn info(&self, message: &str);

    /// Open a collapsible log group
    fn group(&self, title: &str);

    /// Close the current log group
    fn end_group(&self);

    /// Publish a step output
    fn set_output(&self, key: &str, value: &str) -> Result<(), DeployerError>;
}

type Getenv = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Handle on the running workflow step
pub struct Action {
    getenv: Getenv,
}

impl Action {
    /// Create an action reading the process environment
    pub fn new() -> Self {
        Self::with_getenv(|key| std::env::var(key).ok())
    }

    /// Create an action with a custom environment lookup
    pub fn with_getenv<F>(getenv: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            getenv: Box::new(getenv),
        }
    }

    /// Look up an environment variable, treating empty values as unset
    pub fn getenv(&self, key: &str) -> Option<String> {
        (self.getenv)(key).filter(|v| !v.is_empty())
    }

    /// Raw value of an input, trimmed. Empty when unset.
    pub fn get_input(&self, name: &str) -> String {
        let key = format!("INPUT_{}", name.replace(' ', "_").to_uppercase());
        self.getenv(&key)
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }

    /// Read a string input
    pub fn input_as_string(&self, name: &str, required: bool) -> Result<String, DeployerError> {
        let value = self.get_input(name);
        if value.is_empty() && required {
            return Err(DeployerError::InputError(format!(
                "input {:?} is required",
                name
            )));
        }
        Ok(value)
    }

    /// Read a boolean input. An empty optional input reads as `false`.
    pub fn input_as_bool(&self, name: &str, required: bool) -> Result<bool, DeployerError> {
        let value = self.get_input(name);
        if value.is_empty() {
            if required {
                return Err(DeployerError::InputError(format!(
                    "input {:?} is required",
                    name
                )));
            }
            return Ok(false);
        }
        parse_bool(&value).ok_or_else(|| {
            DeployerError::InputError(format!(
                "failed to parse {:?} as a boolean: invalid value {:?}",
                name, value
            ))
        })
    }

    /// Hide a value from the job log
    pub fn add_mask(&self, value: &str) {
        if !value.is_empty() {
            println!("::add-mask::{}", escape_data(value));
        }
    }

    /// Emit an error annotation
    pub fn error(&self, message: &str) {
        println!("::error::{}", escape_data(message));
    }
}

impl Default for Action {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for Action {
    fn info(&self, message: &str) {
        println!("{}", message);
    }

    fn group(&self, title: &str) {
        println!("::group::{}", escape_data(title));
    }

    fn end_group(&self) {
        println!("::endgroup::");
    }

    fn set_output(&self, key: &str, value: &str) -> Result<(), DeployerError> {
        let Some(path) = self.getenv("GITHUB_OUTPUT") else {
            println!("::set-output name={}::{}", escape_property(key), escape_data(value));
            return Ok(());
        };

        debug!("Writing output {:?} to {}", key, path);
        let record = output_record(key, value, &format!("ghadelimiter_{}", Uuid::new_v4()))?;
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.write_all(record.as_bytes())?;
        Ok(())
    }
}

/// Heredoc record for the outputs file
fn output_record(key: &str, value: &str, delimiter: &str) -> Result<String, DeployerError> {
    if key.contains(delimiter) || value.contains(delimiter) {
        return Err(DeployerError::Internal(format!(
            "output {:?} contains the delimiter {:?}",
            key, delimiter
        )));
    }
    Ok(format!("{key}<<{delimiter}\n{value}\n{delimiter}\n"))
}

/// Accepts the same spellings as Go's `strconv.ParseBool`
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}
