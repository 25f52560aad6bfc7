//! Health Planet API client.
//!
//! This crate talks to the Health Planet web API:
//!
//! - [`Credentials`] - client id/secret resolution (env, config.json, .env)
//! - [`OAuthClient`] - the OAuth 2.0 authorization-code exchange
//! - [`HealthPlanetClient`] - the innerscan measurement fetch
//! - [`ProviderError`] - typed errors for all of the above
//!
//! The flow is a linear three-step handshake followed by one data call:
//!
//! ```text
//! authorization_url()          no network; user opens it in a browser
//!        │
//!        ▼
//! user pastes the code
//!        │
//!        ▼
//! OAuthClient::exchange_code   POST /oauth/token  -> AccessToken
//!        │
//!        ▼
//! HealthPlanetClient::fetch_samples
//!                              GET /status/innerscan.json -> SampleBatch
//! ```
//!
//! Tokens live for the process only; there is no refresh flow and no
//! persistence.

pub mod client;
pub mod config;
pub mod error;
pub mod oauth;

pub use client::{DateRange, HealthPlanetClient, SampleBatch};
pub use config::{Credentials, HealthPlanetConfig};
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use oauth::{AccessToken, OAuthClient, authorization_url};
