//! innerscan CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use innerscan_client::cli::{Cli, Command, ConfigAction};
use innerscan_client::error::ClientResult;
use innerscan_client::{commands, prompt, session::Session};
use innerscan_provider::{Credentials, HealthPlanetConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.debug {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(Level::WARN.to_string()))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    match cli.command {
        Some(Command::AuthUrl) => commands::auth_url(),
        Some(Command::Config { action }) => match action {
            ConfigAction::Validate => commands::config_validate(),
            ConfigAction::Sources => commands::config_sources(),
        },
        None => {
            // Credentials are resolved before any network activity; missing
            // credentials end the run here.
            let credentials = Credentials::load()?;
            let config = HealthPlanetConfig::new(credentials);
            let mut session = Session::new(config);
            prompt::run(&cli, &mut session).await
        }
    }
}
