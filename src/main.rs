#![allow(non_snake_case)]

mod cli;

use std::env;
use std::process::ExitCode;

use dentalAgenda::config::{AppConfig, Settings};
use dentalAgenda::state::AppState;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = match env::var("CONFIG_FILE") {
        Ok(path) => AppConfig::from_file(&path).unwrap_or_else(|err| {
            warn!("Ignoring config file: {}", err);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    };

    let settings = match Settings::from_config(&config) {
        Ok(settings) => settings,
        Err(err) => {
            error!("Invalid configuration: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let mut state = AppState::new(settings);
    if cli::cli(&mut state).await {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
