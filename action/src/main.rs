//! App Action - Entry Point
//!
//! Deploys (or deletes) an App Platform app from a workflow step.

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use app_action::app::run::{run_delete, run_deploy};
use app_action::github::action::Action;
use app_action::logs::{init_logging, LogOptions};
use app_action::utils::version_info;

use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments
    let mut mode = "deploy".to_string();
    let mut print_version = false;
    for arg in env::args().skip(1) {
        if arg == "--version" {
            print_version = true;
        } else if !arg.starts_with("--") {
            mode = arg;
        }
    }

    // Print version and exit
    let version = version_info();
    if print_version {
        match serde_json::to_string_pretty(&version) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Failed to encode version: {e}"),
        }
        return ExitCode::SUCCESS;
    }

    let action = Arc::new(Action::new());

    // Initialize logging
    if let Err(e) = init_logging(LogOptions::from_action(&action)) {
        eprintln!("Failed to initialize logging: {e}");
    }
    info!(
        "app-action {} ({}, built {})",
        version.version, version.git_hash, version.build_time
    );

    let result = match mode.as_str() {
        "deploy" => run_deploy(action.clone(), await_shutdown_signal()).await,
        "delete" => run_delete(action.clone()).await,
        other => {
            action.error(&format!("unknown mode {other:?}, expected deploy or delete"));
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            action.error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (Ok(mut sigterm), Ok(mut sigint)) = (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) else {
            tracing::warn!("Failed to install signal handlers, falling back to Ctrl+C");
            let _ = tokio::signal::ctrl_c().await;
            return;
        };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = sigint.recv() => {
                info!("SIGINT received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl+C received, shutting down...");
        }
    }
}
