//! OAuth 2.0 authorization-code flow for Health Planet.
//!
//! Health Planet uses the plain authorization-code grant with a fixed
//! redirect page: the user opens the authorization URL in a browser, grants
//! access, and copies the code shown on the success page back into the
//! application. The code is then exchanged once for an access token.
//!
//! There is no refresh flow; a token is used for the lifetime of the process
//! and discarded on exit.

use serde::Deserialize;
use tracing::info;

use crate::config::{Credentials, HealthPlanetConfig};
use crate::error::{ProviderError, ProviderResult};

/// Health Planet OAuth endpoints.
const AUTH_URL: &str = "https://www.healthplanet.jp/oauth/auth";
const TOKEN_URL: &str = "https://www.healthplanet.jp/oauth/token";

/// Fixed redirect page that displays the authorization code to the user.
pub const REDIRECT_URI: &str = "https://www.healthplanet.jp/success.html";

/// The only scope this application requests.
pub const SCOPE: &str = "innerscan";

/// A bearer access token for the measurement API.
#[derive(Debug, Clone)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token for use as a query parameter.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Builds the authorization URL the user must open in a browser.
///
/// Pure query-string construction; no network call is made.
pub fn authorization_url(client_id: &str) -> String {
    format!(
        "{}?client_id={}&redirect_uri={}&scope={}&response_type=code",
        AUTH_URL,
        urlencoding::encode(client_id),
        urlencoding::encode(REDIRECT_URI),
        SCOPE,
    )
}

/// OAuth client for the one-shot code-for-token exchange.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    credentials: Credentials,
    http_client: reqwest::Client,
}

impl OAuthClient {
    /// Creates a new OAuth client from the provider configuration.
    pub fn new(config: &HealthPlanetConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .expect("failed to create HTTP client");

        Self {
            credentials: config.credentials.clone(),
            http_client,
        }
    }

    /// Builds the authorization URL for the configured client id.
    pub fn authorization_url(&self) -> String {
        authorization_url(&self.credentials.client_id)
    }

    /// Exchanges an authorization code for an access token.
    ///
    /// A single POST; this is a user-triggered, one-shot action and is never
    /// retried automatically. The caller decides whether to ask the user for
    /// a fresh code.
    pub async fn exchange_code(&self, code: &str) -> ProviderResult<AccessToken> {
        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("redirect_uri", REDIRECT_URI),
            ("code", code),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .http_client
            .post(TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(|e| ProviderError::network(format!("token request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(ProviderError::authentication(format!(
                "token exchange failed ({}): {}",
                status, body
            )));
        }

        let token_response: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("invalid token response: {}", e))
        })?;

        info!("obtained access token");
        Ok(AccessToken::new(token_response.access_token))
    }
}

/// Response from the token endpoint. Only the access token is used; the
/// session never refreshes.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}
