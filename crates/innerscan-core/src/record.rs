//! Measurement types for body-composition data.
//!
//! This module provides the core types flowing through the system:
//! - [`RawSample`]: a single tagged measurement as returned by the API
//! - [`DailyRecord`]: all metrics for one calendar day, merged
//! - [`UserProfile`]: profile fields passed through from the API response
//! - [`MeasurementSet`]: the normalized, day-ordered output of a fetch

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// The metric identified by a sample's numeric tag.
///
/// Health Planet identifies metrics by numeric codes; only the two
/// body-composition tags are requested and represented. Samples carrying any
/// other code are dropped at the provider boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementTag {
    /// Body weight in kilograms (tag 6021).
    Weight,
    /// Body fat percentage (tag 6022).
    BodyFat,
}

impl MeasurementTag {
    /// Tags requested on every measurement fetch.
    pub const ALL: [MeasurementTag; 2] = [MeasurementTag::Weight, MeasurementTag::BodyFat];

    /// Parses an API tag code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "6021" => Some(Self::Weight),
            "6022" => Some(Self::BodyFat),
            _ => None,
        }
    }

    /// Returns the API code for this tag.
    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Weight => "6021",
            Self::BodyFat => "6022",
        }
    }

    /// Returns the comma-separated `tag` query parameter value.
    pub fn query_param() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_code())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// A single raw measurement sample from the API.
///
/// One sample per (timestamp, metric); a measurement session on the scale
/// produces one sample for each recorded tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSample {
    /// Measurement timestamp as a 14-digit `YYYYMMDDHHMMSS` string.
    pub measured_at: String,
    /// The metric this sample carries.
    pub tag: MeasurementTag,
    /// The measured value as a decimal string.
    pub keydata: String,
    /// Device identifier that produced the measurement.
    pub model: String,
}

impl RawSample {
    /// Creates a new raw sample.
    pub fn new(
        measured_at: impl Into<String>,
        tag: MeasurementTag,
        keydata: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            measured_at: measured_at.into(),
            tag,
            keydata: keydata.into(),
            model: model.into(),
        }
    }
}

/// All metrics measured on one calendar day.
///
/// Unique per day. An absent metric is `None`, never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// The calendar day.
    pub date: NaiveDate,
    /// First-seen measurement timestamp for the day.
    pub datetime: NaiveDateTime,
    /// Body weight in kilograms, if measured.
    pub weight: Option<f64>,
    /// Body fat percentage, if measured.
    pub body_fat: Option<f64>,
    /// Device identifier from the first-seen sample of the day.
    pub model: String,
}

/// Biological sex as reported by the API profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Parses the API's profile string leniently; unknown values map to `None`.
    pub fn from_api_str(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("male") {
            Some(Self::Male)
        } else if value.eq_ignore_ascii_case("female") {
            Some(Self::Female)
        } else {
            None
        }
    }

    /// Returns the canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

/// User profile fields passed through unchanged from the raw response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Birth date as the API's 8-digit `YYYYMMDD` string.
    pub birth_date: Option<String>,
    /// Height in centimeters.
    pub height: Option<f64>,
    /// Biological sex.
    pub sex: Option<Sex>,
}

impl UserProfile {
    /// Returns true if no profile field is populated.
    pub fn is_empty(&self) -> bool {
        self.birth_date.is_none() && self.height.is_none() && self.sex.is_none()
    }

    /// Returns the birth date reformatted as `YYYY-MM-DD`, when it is a
    /// well-formed 8-digit string.
    pub fn formatted_birth_date(&self) -> Option<String> {
        let raw = self.birth_date.as_deref()?;
        if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(format!("{}-{}-{}", &raw[..4], &raw[4..6], &raw[6..8]))
    }
}

/// The normalized result of one fetch: day-descending records plus the
/// user profile from the same response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSet {
    /// Daily records, sorted by calendar day descending (most recent first).
    pub records: Vec<DailyRecord>,
    /// Profile fields from the raw response.
    pub profile: UserProfile,
}

impl MeasurementSet {
    /// Returns the number of measured days.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no day has any measurement.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the (oldest, newest) calendar days covered by the records.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let newest = self.records.first()?.date;
        let oldest = self.records.last()?.date;
        Some((oldest, newest))
    }
}
