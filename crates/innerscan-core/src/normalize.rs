//! Raw sample to daily record normalization.
//!
//! The API returns a flat list of tagged samples, one per (timestamp, metric),
//! in no guaranteed order. Normalization groups them into one record per
//! calendar day:
//!
//! 1. The calendar day is the first 8 digits of the 14-digit timestamp.
//! 2. The day's `datetime` and `model` come from the first sample encountered
//!    for that day in input order; later samples never overwrite them.
//! 3. Metric values are assigned by tag and parsed as decimals. A same-day
//!    duplicate of the same tag overwrites the earlier value (last write
//!    wins). The asymmetry with the identity fields above is deliberate and
//!    load-bearing.
//! 4. Records are sorted by calendar day descending (most recent first).

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::warn;

use crate::record::{DailyRecord, MeasurementSet, MeasurementTag, RawSample, UserProfile};

/// Timestamp layout used by the measurement API.
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Groups raw samples into per-day records and pairs them with the profile.
///
/// Samples with an unparseable timestamp or a non-numeric value are skipped
/// with a warning rather than failing the whole batch.
pub fn normalize(samples: &[RawSample], profile: UserProfile) -> MeasurementSet {
    let mut by_day: HashMap<NaiveDate, DailyRecord> = HashMap::new();

    for sample in samples {
        let Some(datetime) = parse_timestamp(&sample.measured_at) else {
            warn!("skipping sample with malformed timestamp {:?}", sample.measured_at);
            continue;
        };
        let Ok(value) = sample.keydata.parse::<f64>() else {
            warn!("skipping sample with non-numeric value {:?}", sample.keydata);
            continue;
        };

        let record = by_day.entry(datetime.date()).or_insert_with(|| DailyRecord {
            date: datetime.date(),
            datetime,
            weight: None,
            body_fat: None,
            model: sample.model.clone(),
        });

        match sample.tag {
            MeasurementTag::Weight => record.weight = Some(value),
            MeasurementTag::BodyFat => record.body_fat = Some(value),
        }
    }

    let mut records: Vec<DailyRecord> = by_day.into_values().collect();
    records.sort_by(|a, b| b.date.cmp(&a.date));

    MeasurementSet { records, profile }
}

/// Parses a 14-digit `YYYYMMDDHHMMSS` timestamp.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if raw.len() != 14 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).ok()
}
