//! Credential loading and client configuration.
//!
//! Client id/secret are resolved in precedence order:
//!
//! 1. environment variables (`HEALTH_PLANET_CLIENT_ID` / `..._CLIENT_SECRET`)
//! 2. `config.json` in the working directory
//! 3. a `.env` dotfile (loaded into the environment via dotenvy)
//!
//! Absence of all three is a fatal startup condition, surfaced before any
//! network activity.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{ProviderError, ProviderResult};

/// Environment variable holding the OAuth client id.
pub const ENV_CLIENT_ID: &str = "HEALTH_PLANET_CLIENT_ID";

/// Environment variable holding the OAuth client secret.
pub const ENV_CLIENT_SECRET: &str = "HEALTH_PLANET_CLIENT_SECRET";

/// Name of the JSON credential file looked up in the working directory.
pub const CONFIG_FILE: &str = "config.json";

/// Placeholder value shipped in config templates; treated as absent.
const PLACEHOLDER_CLIENT_ID: &str = "YOUR_CLIENT_ID";

/// OAuth 2.0 client credentials for Health Planet API access.
///
/// Users must register their own application on the Health Planet developer
/// page to obtain these.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// The OAuth 2.0 client id.
    pub client_id: String,
    /// The OAuth 2.0 client secret.
    pub client_secret: String,
}

/// Structure of the `config.json` credential file.
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl Credentials {
    /// Creates new credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Resolves credentials from the configured sources in precedence order.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no source yields a usable pair.
    pub fn load() -> ProviderResult<Self> {
        if let Some(creds) = Self::from_env() {
            info!("loaded credentials from environment");
            return Ok(creds);
        }

        if let Some(creds) = Self::from_config_file(Path::new(CONFIG_FILE)) {
            info!("loaded credentials from {}", CONFIG_FILE);
            return Ok(creds);
        }

        // A .env file only populates the environment; re-read it afterwards.
        if dotenvy::dotenv().is_ok()
            && let Some(creds) = Self::from_env()
        {
            info!("loaded credentials from .env file");
            return Ok(creds);
        }

        Err(ProviderError::configuration(format!(
            "no credentials found: set {}/{}, create {}, or provide a .env file",
            ENV_CLIENT_ID, ENV_CLIENT_SECRET, CONFIG_FILE
        )))
    }

    /// Reads credentials from the process environment.
    fn from_env() -> Option<Self> {
        let client_id = std::env::var(ENV_CLIENT_ID).ok()?;
        let client_secret = std::env::var(ENV_CLIENT_SECRET).ok()?;
        if client_id.is_empty() || client_secret.is_empty() {
            return None;
        }
        Some(Self::new(client_id, client_secret))
    }

    /// Reads credentials from a JSON config file.
    ///
    /// A missing file is silently skipped; a malformed one is skipped with a
    /// warning so the remaining sources are still consulted.
    pub fn from_config_file(path: &Path) -> Option<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("failed to read {}: {}", path.display(), e);
                return None;
            }
        };
        match Self::from_json(&content) {
            Ok(creds) => Some(creds),
            Err(e) => {
                warn!("ignoring {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Parses credentials from a `config.json` string.
    ///
    /// Rejects the `YOUR_CLIENT_ID` placeholder so an unedited template does
    /// not shadow a valid `.env` file.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let file: CredentialsFile = serde_json::from_str(json)
            .map_err(|e| format!("failed to parse credentials JSON: {}", e))?;

        let (Some(client_id), Some(client_secret)) = (file.client_id, file.client_secret) else {
            return Err("missing client_id/client_secret".to_string());
        };
        if client_id.is_empty() || client_secret.is_empty() {
            return Err("empty client_id/client_secret".to_string());
        }
        if client_id == PLACEHOLDER_CLIENT_ID {
            return Err("client_id is still the template placeholder".to_string());
        }

        Ok(Self::new(client_id, client_secret))
    }

    /// Validates that the credentials appear usable.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.client_id.is_empty() {
            return Err("client_id is required");
        }
        if self.client_secret.is_empty() {
            return Err("client_secret is required");
        }
        Ok(())
    }
}

/// Configuration for the Health Planet API client.
#[derive(Debug, Clone)]
pub struct HealthPlanetConfig {
    /// OAuth credentials for API access.
    pub credentials: Credentials,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string for API requests.
    pub user_agent: String,
}

impl HealthPlanetConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Creates a new configuration with the given credentials.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("innerscan/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.credentials
            .validate()
            .map_err(|e| format!("invalid credentials: {}", e))
    }
}
