//! One-shot CLI subcommands.

use innerscan_provider::config::{CONFIG_FILE, ENV_CLIENT_ID, ENV_CLIENT_SECRET};
use innerscan_provider::{Credentials, authorization_url};

use crate::error::{ClientError, ClientResult};

/// Print the authorization URL for the resolved credentials.
pub fn auth_url() -> ClientResult<()> {
    let credentials = Credentials::load()?;
    println!("{}", authorization_url(&credentials.client_id));
    Ok(())
}

/// Check that credentials can be resolved from the configured sources.
pub fn config_validate() -> ClientResult<()> {
    let credentials = Credentials::load()?;
    credentials
        .validate()
        .map_err(|e| ClientError::Config(e.to_string()))?;
    println!("Credentials resolved (client id {}).", credentials.client_id);
    Ok(())
}

/// Show the credential sources in precedence order.
pub fn config_sources() -> ClientResult<()> {
    println!("Credential sources, in precedence order:");
    println!("  1. environment: {} / {}", ENV_CLIENT_ID, ENV_CLIENT_SECRET);
    println!("  2. {} in the working directory", CONFIG_FILE);
    println!("  3. .env file (same variables)");
    Ok(())
}
