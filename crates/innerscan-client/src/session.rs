//! Session state and action handlers.
//!
//! A [`Session`] owns everything an interactive run mutates: the auth state,
//! the access token (inside the API client), and the current dataset. It is
//! passed explicitly to each action handler; there is no ambient global
//! state.
//!
//! The two network-bound actions (code exchange, sample fetch) run on
//! spawned worker tasks so the interactive thread is never blocked inside
//! the HTTP client; only the completed result is marshalled back into the
//! session. A fetch is rejected while another is outstanding; the guard is
//! cleared on both the success and failure paths. There is no cancellation
//! or timeout beyond the HTTP client's own, so a request that never returns
//! leaves the guard set for the rest of the session.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Local;
use tracing::{debug, info};

use innerscan_core::{
    MeasurementSet, Summary, default_filename, normalize, write_csv, write_csv_with_profile,
};
use innerscan_provider::{DateRange, HealthPlanetClient, HealthPlanetConfig, OAuthClient};

use crate::error::{ClientError, ClientResult};

/// Authentication progress within one session.
///
/// Transitions run forward only; there is no refresh flow and the token is
/// discarded on process exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// No authorization URL has been issued yet.
    Unauthenticated,
    /// The authorization URL was issued to the user.
    AuthorizationRequested,
    /// The user pasted a code; the exchange may still fail.
    CodeReceived,
    /// An access token is held for the rest of the session.
    Authenticated,
}

impl AuthState {
    /// Short status label for the prompt.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "not authenticated",
            Self::AuthorizationRequested => "waiting for authorization code",
            Self::CodeReceived => "exchanging authorization code",
            Self::Authenticated => "authenticated",
        }
    }
}

/// The outcome of a completed fetch action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The dataset was replaced with `days` normalized records.
    Fetched { days: usize },
    /// The response carried no samples for the range; the previous dataset,
    /// if any, is left untouched.
    NoData,
}

/// Where and how an export writes its file.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Directory that relative outputs are resolved against.
    pub data_dir: PathBuf,
    /// Explicit output file, absolute or relative to `data_dir`.
    pub output: Option<PathBuf>,
    /// Whether to append the user-profile section.
    pub with_profile: bool,
}

impl ExportOptions {
    /// Resolves the target path, generating the default timestamped filename
    /// when no output was given.
    pub fn resolve_path(&self, now: chrono::NaiveDateTime) -> PathBuf {
        match &self.output {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.data_dir.join(path),
            None => self.data_dir.join(default_filename(now)),
        }
    }
}

/// Mutable state of one interactive run.
pub struct Session {
    config: HealthPlanetConfig,
    oauth: OAuthClient,
    auth_state: AuthState,
    client: Option<HealthPlanetClient>,
    dataset: Option<MeasurementSet>,
    fetch_in_flight: Arc<AtomicBool>,
}

impl Session {
    /// Creates a new session from a validated configuration.
    pub fn new(config: HealthPlanetConfig) -> Self {
        let oauth = OAuthClient::new(&config);
        Self {
            config,
            oauth,
            auth_state: AuthState::Unauthenticated,
            client: None,
            dataset: None,
            fetch_in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the current auth state.
    pub fn auth_state(&self) -> AuthState {
        self.auth_state
    }

    /// Returns true once an access token is held.
    pub fn is_authenticated(&self) -> bool {
        self.auth_state == AuthState::Authenticated
    }

    /// Returns the current dataset, if a fetch has completed.
    pub fn dataset(&self) -> Option<&MeasurementSet> {
        self.dataset.as_ref()
    }

    /// Issues the authorization URL and advances the auth state.
    pub fn begin_authorization(&mut self) -> String {
        self.auth_state = AuthState::AuthorizationRequested;
        self.oauth.authorization_url()
    }

    /// Exchanges a pasted authorization code for an access token on a worker
    /// task.
    ///
    /// On failure the state stays at `CodeReceived` so the user can paste a
    /// fresh code; nothing is retried automatically.
    pub async fn submit_code(&mut self, code: &str) -> ClientResult<()> {
        let code = code.trim().to_string();
        if code.is_empty() {
            return Err(ClientError::Input("empty authorization code".to_string()));
        }

        self.auth_state = AuthState::CodeReceived;

        let oauth = self.oauth.clone();
        let handle = tokio::spawn(async move { oauth.exchange_code(&code).await });
        let token = handle
            .await
            .map_err(|e| ClientError::Provider(format!("worker task failed: {}", e)))??;

        self.client = Some(HealthPlanetClient::new(token, &self.config));
        self.auth_state = AuthState::Authenticated;
        info!("session authenticated");
        Ok(())
    }

    /// Fetches and normalizes samples for the range on a worker task.
    ///
    /// Rejected with [`ClientError::Busy`] while another fetch is
    /// outstanding.
    pub async fn fetch(&mut self, range: DateRange) -> ClientResult<FetchOutcome> {
        let Some(client) = &self.client else {
            return Err(ClientError::Provider(
                "not authenticated - authorize first".to_string(),
            ));
        };

        if self.fetch_in_flight.swap(true, Ordering::SeqCst) {
            return Err(ClientError::Busy);
        }

        let client = client.clone();
        let in_flight = Arc::clone(&self.fetch_in_flight);
        let handle = tokio::spawn(async move {
            let result = client.fetch_samples(range).await;
            in_flight.store(false, Ordering::SeqCst);
            result
        });

        let result = handle.await.map_err(|e| {
            self.fetch_in_flight.store(false, Ordering::SeqCst);
            ClientError::Provider(format!("worker task failed: {}", e))
        })?;

        match result? {
            None => Ok(FetchOutcome::NoData),
            Some(batch) => {
                debug!("normalizing {} raw sample(s)", batch.samples.len());
                let set = normalize(&batch.samples, batch.profile);
                if set.is_empty() {
                    return Ok(FetchOutcome::NoData);
                }
                let days = set.len();
                self.dataset = Some(set);
                Ok(FetchOutcome::Fetched { days })
            }
        }
    }

    /// Writes the current dataset to a delimited file and returns the
    /// written path.
    ///
    /// On failure the dataset is retained so the user can retry with a
    /// different path.
    pub fn export(&self, options: &ExportOptions) -> ClientResult<PathBuf> {
        let Some(set) = &self.dataset else {
            return Err(ClientError::Export(
                "no dataset to export - fetch first".to_string(),
            ));
        };

        let path = options.resolve_path(Local::now().naive_local());
        let written = if options.with_profile {
            write_csv_with_profile(set, &path)?
        } else {
            write_csv(set, &path)?
        };
        Ok(written)
    }

    /// Computes the display summary over the current dataset.
    pub fn summary(&self) -> Option<Summary> {
        self.dataset.as_ref().map(Summary::from_set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use innerscan_core::{DailyRecord, UserProfile};
    use innerscan_provider::{AccessToken, Credentials};

    fn test_config() -> HealthPlanetConfig {
        HealthPlanetConfig::new(Credentials::new("test-id", "test-secret"))
    }

    fn test_dataset() -> MeasurementSet {
        let date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
        MeasurementSet {
            records: vec![DailyRecord {
                date,
                datetime: date.and_hms_opt(7, 0, 0).unwrap(),
                weight: Some(65.4),
                body_fat: Some(18.2),
                model: "X1".to_string(),
            }],
            profile: UserProfile::default(),
        }
    }

    #[test]
    fn starts_unauthenticated() {
        let session = Session::new(test_config());
        assert_eq!(session.auth_state(), AuthState::Unauthenticated);
        assert!(!session.is_authenticated());
        assert!(session.dataset().is_none());
    }

    #[test]
    fn begin_authorization_advances_state() {
        let mut session = Session::new(test_config());
        let url = session.begin_authorization();

        assert_eq!(session.auth_state(), AuthState::AuthorizationRequested);
        assert!(url.contains("client_id=test-id"));
        assert!(url.contains("response_type=code"));
    }

    #[test]
    fn auth_state_labels() {
        assert_eq!(AuthState::Unauthenticated.describe(), "not authenticated");
        assert_eq!(AuthState::Authenticated.describe(), "authenticated");
    }

    #[tokio::test]
    async fn empty_code_is_rejected() {
        let mut session = Session::new(test_config());
        session.begin_authorization();

        let result = session.submit_code("   ").await;
        assert!(matches!(result, Err(ClientError::Input(_))));
        // An invalid code never leaves AuthorizationRequested.
        assert_eq!(session.auth_state(), AuthState::AuthorizationRequested);
    }

    #[tokio::test]
    async fn fetch_requires_authentication() {
        let mut session = Session::new(test_config());
        let result = session.fetch(DateRange::TrailingDays(7)).await;
        assert!(matches!(result, Err(ClientError::Provider(_))));
    }

    #[tokio::test]
    async fn concurrent_fetch_is_rejected() {
        let config = test_config();
        let mut session = Session::new(config.clone());
        session.client = Some(HealthPlanetClient::new(AccessToken::new("token"), &config));
        session.auth_state = AuthState::Authenticated;

        // Simulate an outstanding request.
        session.fetch_in_flight.store(true, Ordering::SeqCst);

        let result = session.fetch(DateRange::TrailingDays(7)).await;
        assert!(matches!(result, Err(ClientError::Busy)));
    }

    #[test]
    fn export_without_dataset_fails() {
        let session = Session::new(test_config());
        let options = ExportOptions {
            data_dir: PathBuf::from("data"),
            output: None,
            with_profile: false,
        };
        assert!(matches!(
            session.export(&options),
            Err(ClientError::Export(_))
        ));
    }

    #[test]
    fn export_writes_current_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(test_config());
        session.dataset = Some(test_dataset());

        let options = ExportOptions {
            data_dir: dir.path().to_path_buf(),
            output: Some(PathBuf::from("out.csv")),
            with_profile: false,
        };
        let written = session.export(&options).unwrap();

        assert_eq!(written, dir.path().join("out.csv"));
        assert!(written.exists());
        // The dataset survives the export.
        assert!(session.dataset().is_some());
    }

    #[test]
    fn summary_follows_dataset() {
        let mut session = Session::new(test_config());
        assert!(session.summary().is_none());

        session.dataset = Some(test_dataset());
        let summary = session.summary().unwrap();
        assert_eq!(summary.days, 1);
    }

    mod export_options {
        use super::*;

        fn now() -> chrono::NaiveDateTime {
            NaiveDate::from_ymd_opt(2025, 8, 7)
                .unwrap()
                .and_hms_opt(14, 3, 9)
                .unwrap()
        }

        #[test]
        fn default_filename_in_data_dir() {
            let options = ExportOptions {
                data_dir: PathBuf::from("data"),
                output: None,
                with_profile: false,
            };
            assert_eq!(
                options.resolve_path(now()),
                PathBuf::from("data/health_data_20250807_140309.csv")
            );
        }

        #[test]
        fn relative_output_joins_data_dir() {
            let options = ExportOptions {
                data_dir: PathBuf::from("data"),
                output: Some(PathBuf::from("my.csv")),
                with_profile: false,
            };
            assert_eq!(options.resolve_path(now()), PathBuf::from("data/my.csv"));
        }

        #[test]
        fn absolute_output_is_kept() {
            let options = ExportOptions {
                data_dir: PathBuf::from("data"),
                output: Some(PathBuf::from("/tmp/my.csv")),
                with_profile: false,
            };
            assert_eq!(options.resolve_path(now()), PathBuf::from("/tmp/my.csv"));
        }
    }
}
