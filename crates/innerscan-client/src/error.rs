//! Client error types.

use std::fmt;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
///
/// Every variant is converted to a user-facing message at the boundary of
/// the triggering action; none terminates the interactive session.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error (missing or invalid credentials).
    Config(String),
    /// Provider error (network, authentication, bad response).
    Provider(String),
    /// Export failed; the in-memory dataset is retained for a retry.
    Export(String),
    /// A fetch is already outstanding.
    Busy,
    /// Invalid interactive input (dates, codes).
    Input(String),
    /// IO error.
    Io(std::io::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Provider(msg) => write!(f, "provider error: {}", msg),
            Self::Export(msg) => write!(f, "export failed: {}", msg),
            Self::Busy => write!(f, "a fetch is already in progress"),
            Self::Input(msg) => write!(f, "invalid input: {}", msg),
            Self::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<innerscan_provider::ProviderError> for ClientError {
    fn from(err: innerscan_provider::ProviderError) -> Self {
        match err.code() {
            innerscan_provider::ProviderErrorCode::ConfigurationError => {
                Self::Config(err.message().to_string())
            }
            _ => Self::Provider(err.to_string()),
        }
    }
}

impl From<innerscan_core::ExportError> for ClientError {
    fn from(err: innerscan_core::ExportError) -> Self {
        Self::Export(err.to_string())
    }
}
