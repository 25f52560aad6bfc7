//! Measurement fetch against the innerscan endpoint.
//!
//! A single GET returns every sample in the requested range along with the
//! user's profile fields; the API does not paginate. Response items are
//! converted to [`RawSample`]s here, dropping samples with tags this
//! application never requested.

use chrono::{Duration, Local, NaiveDateTime};
use serde::Deserialize;
use tracing::{debug, warn};

use innerscan_core::{MeasurementTag, RawSample, Sex, UserProfile};

use crate::config::HealthPlanetConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::oauth::AccessToken;

/// Measurement endpoint for the innerscan scope.
const INNERSCAN_URL: &str = "https://www.healthplanet.jp/status/innerscan.json";

/// Query timestamp layout.
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// The date range of a measurement fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    /// The trailing N days up to now.
    TrailingDays(u32),
    /// An explicit inclusive day range.
    Explicit {
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    },
}

impl DateRange {
    /// Resolves the range to 14-digit `from`/`to` query timestamps.
    ///
    /// An explicit range covers its boundary days in full (midnight to
    /// 23:59:59); a trailing range ends at `now`.
    pub fn to_query_timestamps(&self, now: NaiveDateTime) -> (String, String) {
        match self {
            Self::TrailingDays(days) => {
                let from = now - Duration::days(i64::from(*days));
                (
                    from.format(TIMESTAMP_FORMAT).to_string(),
                    now.format(TIMESTAMP_FORMAT).to_string(),
                )
            }
            Self::Explicit { from, to } => (
                from.and_hms_opt(0, 0, 0)
                    .expect("valid time")
                    .format(TIMESTAMP_FORMAT)
                    .to_string(),
                to.and_hms_opt(23, 59, 59)
                    .expect("valid time")
                    .format(TIMESTAMP_FORMAT)
                    .to_string(),
            ),
        }
    }
}

/// The converted payload of one fetch: raw samples plus profile fields.
#[derive(Debug, Clone, Default)]
pub struct SampleBatch {
    /// Raw samples in response order.
    pub samples: Vec<RawSample>,
    /// Profile fields from the same response.
    pub profile: UserProfile,
}

/// Health Planet measurement API client.
///
/// Stateless beyond the short-lived access token it was created with.
#[derive(Debug, Clone)]
pub struct HealthPlanetClient {
    http_client: reqwest::Client,
    access_token: AccessToken,
}

impl HealthPlanetClient {
    /// Creates a new client holding the given access token.
    pub fn new(access_token: AccessToken, config: &HealthPlanetConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .expect("failed to create HTTP client");

        Self {
            http_client,
            access_token,
        }
    }

    /// Fetches body-composition samples for the given range.
    ///
    /// Returns `Ok(None)` when the response carries no data envelope: that is
    /// a valid "no data in range" outcome, distinct from a network failure.
    pub async fn fetch_samples(&self, range: DateRange) -> ProviderResult<Option<SampleBatch>> {
        let (from, to) = range.to_query_timestamps(Local::now().naive_local());
        let tag = MeasurementTag::query_param();
        debug!("fetching innerscan samples from {} to {}", from, to);

        let response = self
            .http_client
            .get(INNERSCAN_URL)
            .query(&[
                ("access_token", self.access_token.as_str()),
                // Select by measurement date rather than registration date.
                ("date", "1"),
                ("from", from.as_str()),
                ("to", to.as_str()),
                ("tag", tag.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::network("request timeout")
                } else if e.is_connect() {
                    ProviderError::network(format!("connection failed: {}", e))
                } else {
                    ProviderError::network(format!("request failed: {}", e))
                }
            })?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProviderError::authentication(
                "access token rejected - authorize again",
            ));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::server(format!(
                "API error ({}): {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        let raw: InnerscanResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse response: {}", e))
        })?;

        Ok(convert_response(raw))
    }
}

/// Converts the raw API response, or `None` when the data envelope is absent.
fn convert_response(raw: InnerscanResponse) -> Option<SampleBatch> {
    let data = raw.data?;
    let samples = data.into_iter().filter_map(convert_sample).collect();
    let profile = convert_profile(raw.birth_date, raw.height, raw.sex);
    Some(SampleBatch { samples, profile })
}

fn convert_sample(item: ApiSample) -> Option<RawSample> {
    let Some(tag) = MeasurementTag::from_code(&item.tag) else {
        warn!("skipping sample with unknown tag {:?}", item.tag);
        return None;
    };
    Some(RawSample::new(
        item.date,
        tag,
        item.keydata,
        item.model.unwrap_or_default(),
    ))
}

fn convert_profile(
    birth_date: Option<String>,
    height: Option<String>,
    sex: Option<String>,
) -> UserProfile {
    UserProfile {
        birth_date: birth_date.filter(|b| !b.is_empty()),
        height: height.as_deref().and_then(|h| h.parse::<f64>().ok()),
        sex: sex.as_deref().and_then(Sex::from_api_str),
    }
}

/// Raw response from the innerscan endpoint.
#[derive(Debug, Deserialize)]
struct InnerscanResponse {
    #[serde(default)]
    data: Option<Vec<ApiSample>>,
    #[serde(default)]
    birth_date: Option<String>,
    #[serde(default)]
    height: Option<String>,
    #[serde(default)]
    sex: Option<String>,
}

/// A single sample item from the API.
#[derive(Debug, Deserialize)]
struct ApiSample {
    date: String,
    tag: String,
    keydata: String,
    model: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    mod date_range {
        use super::*;

        fn now() -> NaiveDateTime {
            NaiveDate::from_ymd_opt(2025, 8, 7)
                .unwrap()
                .and_hms_opt(12, 30, 45)
                .unwrap()
        }

        #[test]
        fn trailing_days() {
            let (from, to) = DateRange::TrailingDays(7).to_query_timestamps(now());
            assert_eq!(from, "20250731123045");
            assert_eq!(to, "20250807123045");
        }

        #[test]
        fn explicit_range_covers_full_days() {
            let range = DateRange::Explicit {
                from: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
                to: NaiveDate::from_ymd_opt(2025, 8, 5).unwrap(),
            };
            let (from, to) = range.to_query_timestamps(now());
            assert_eq!(from, "20250801000000");
            assert_eq!(to, "20250805235959");
        }
    }

    mod response_conversion {
        use super::*;

        fn sample_json() -> &'static str {
            r#"{
                "birth_date": "19900115",
                "height": "172.5",
                "sex": "male",
                "data": [
                    {
                        "date": "20250801070000",
                        "keydata": "65.40",
                        "model": "01000144",
                        "tag": "6021"
                    },
                    {
                        "date": "20250801070000",
                        "keydata": "18.20",
                        "model": "01000144",
                        "tag": "6022"
                    }
                ]
            }"#
        }

        #[test]
        fn parses_full_response() {
            let raw: InnerscanResponse = serde_json::from_str(sample_json()).unwrap();
            let batch = convert_response(raw).unwrap();

            assert_eq!(batch.samples.len(), 2);
            assert_eq!(batch.samples[0].tag, MeasurementTag::Weight);
            assert_eq!(batch.samples[0].keydata, "65.40");
            assert_eq!(batch.samples[1].tag, MeasurementTag::BodyFat);
            assert_eq!(batch.profile.birth_date.as_deref(), Some("19900115"));
            assert_eq!(batch.profile.height, Some(172.5));
            assert_eq!(batch.profile.sex, Some(Sex::Male));
        }

        #[test]
        fn missing_data_envelope_is_none() {
            let raw: InnerscanResponse =
                serde_json::from_str(r#"{ "birth_date": "19900115" }"#).unwrap();
            assert!(convert_response(raw).is_none());
        }

        #[test]
        fn empty_data_list_is_an_empty_batch() {
            let raw: InnerscanResponse = serde_json::from_str(r#"{ "data": [] }"#).unwrap();
            let batch = convert_response(raw).unwrap();
            assert!(batch.samples.is_empty());
        }

        #[test]
        fn unknown_tags_are_dropped() {
            let json = r#"{
                "data": [
                    { "date": "20250801070000", "keydata": "55.0", "model": "X1", "tag": "6023" },
                    { "date": "20250801070000", "keydata": "65.4", "model": "X1", "tag": "6021" }
                ]
            }"#;
            let raw: InnerscanResponse = serde_json::from_str(json).unwrap();
            let batch = convert_response(raw).unwrap();

            assert_eq!(batch.samples.len(), 1);
            assert_eq!(batch.samples[0].tag, MeasurementTag::Weight);
        }

        #[test]
        fn profile_fields_are_lenient() {
            let profile = convert_profile(
                Some(String::new()),
                Some("not-a-number".to_string()),
                Some("unknown".to_string()),
            );
            assert!(profile.birth_date.is_none());
            assert!(profile.height.is_none());
            assert!(profile.sex.is_none());
            assert!(profile.is_empty());
        }

        #[test]
        fn missing_model_becomes_empty_string() {
            let json = r#"{
                "data": [
                    { "date": "20250801070000", "keydata": "65.4", "tag": "6021" }
                ]
            }"#;
            let raw: InnerscanResponse = serde_json::from_str(json).unwrap();
            let batch = convert_response(raw).unwrap();
            assert_eq!(batch.samples[0].model, "");
        }
    }
}
