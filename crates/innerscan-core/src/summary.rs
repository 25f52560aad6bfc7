//! Display-only summary statistics over a normalized measurement set.

use std::fmt;

use chrono::NaiveDate;

use crate::record::MeasurementSet;

/// Latest/average/min/max for one metric.
///
/// "Latest" follows the record order, which is day-descending.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSummary {
    pub latest: f64,
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

impl MetricSummary {
    /// Computes a summary over values in record order (newest first).
    ///
    /// Returns `None` when no day carries the metric.
    fn over(values: &[f64]) -> Option<Self> {
        let latest = *values.first()?;
        let sum: f64 = values.iter().sum();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(Self {
            latest,
            average: sum / values.len() as f64,
            min,
            max,
        })
    }
}

/// Summary statistics for one fetch, computed purely for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Number of measured days, taken from the normalized record set.
    pub days: usize,
    /// Weight statistics, when any day has a weight sample.
    pub weight: Option<MetricSummary>,
    /// Body-fat statistics, when any day has a body-fat sample.
    pub body_fat: Option<MetricSummary>,
    /// (oldest, newest) days covered.
    pub span: Option<(NaiveDate, NaiveDate)>,
}

impl Summary {
    /// Computes the summary over an ordered record set.
    pub fn from_set(set: &MeasurementSet) -> Self {
        let weights: Vec<f64> = set.records.iter().filter_map(|r| r.weight).collect();
        let body_fats: Vec<f64> = set.records.iter().filter_map(|r| r.body_fat).collect();

        Self {
            days: set.records.len(),
            weight: MetricSummary::over(&weights),
            body_fat: MetricSummary::over(&body_fats),
            span: set.date_span(),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Measured days: {}", self.days)?;
        if let Some(w) = &self.weight {
            writeln!(
                f,
                "Weight:   latest {:.1} kg, average {:.1} kg, range {:.1}-{:.1} kg",
                w.latest, w.average, w.min, w.max
            )?;
        }
        if let Some(b) = &self.body_fat {
            writeln!(
                f,
                "Body fat: latest {:.1} %, average {:.1} %, range {:.1}-{:.1} %",
                b.latest, b.average, b.min, b.max
            )?;
        }
        if let Some((oldest, newest)) = self.span {
            writeln!(f, "Period:   {} to {}", oldest, newest)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DailyRecord, UserProfile};

    fn record(day: u32, weight: Option<f64>, body_fat: Option<f64>) -> DailyRecord {
        let date = NaiveDate::from_ymd_opt(2025, 8, day).unwrap();
        DailyRecord {
            date,
            datetime: date.and_hms_opt(7, 0, 0).unwrap(),
            weight,
            body_fat,
            model: "X1".to_string(),
        }
    }

    fn set(records: Vec<DailyRecord>) -> MeasurementSet {
        MeasurementSet {
            records,
            profile: UserProfile::default(),
        }
    }

    #[test]
    fn statistics_over_both_metrics() {
        // Records are newest-first, so day 3 is "latest".
        let summary = Summary::from_set(&set(vec![
            record(3, Some(65.0), Some(18.0)),
            record(2, Some(66.0), Some(19.0)),
            record(1, Some(64.0), Some(20.0)),
        ]));

        assert_eq!(summary.days, 3);
        let w = summary.weight.unwrap();
        assert_eq!(w.latest, 65.0);
        assert_eq!(w.average, 65.0);
        assert_eq!(w.min, 64.0);
        assert_eq!(w.max, 66.0);
        let b = summary.body_fat.unwrap();
        assert_eq!(b.latest, 18.0);
        assert_eq!(b.min, 18.0);
        assert_eq!(b.max, 20.0);
    }

    #[test]
    fn metric_absent_from_every_day() {
        let summary = Summary::from_set(&set(vec![record(1, Some(65.0), None)]));
        assert!(summary.weight.is_some());
        assert!(summary.body_fat.is_none());
    }

    #[test]
    fn day_count_comes_from_records_not_sample_count() {
        // One day with a single metric still counts as one day; the old
        // sample-count-divided-by-two heuristic would report zero.
        let summary = Summary::from_set(&set(vec![record(1, Some(65.0), None)]));
        assert_eq!(summary.days, 1);
    }

    #[test]
    fn empty_set() {
        let summary = Summary::from_set(&set(vec![]));
        assert_eq!(summary.days, 0);
        assert!(summary.weight.is_none());
        assert!(summary.body_fat.is_none());
        assert!(summary.span.is_none());
    }

    #[test]
    fn display_renders_span_and_metrics() {
        let summary = Summary::from_set(&set(vec![
            record(3, Some(65.0), None),
            record(1, Some(64.0), Some(18.2)),
        ]));
        let text = summary.to_string();

        assert!(text.contains("Measured days: 2"));
        assert!(text.contains("Weight:   latest 65.0 kg"));
        assert!(text.contains("Body fat: latest 18.2 %"));
        assert!(text.contains("Period:   2025-08-01 to 2025-08-03"));
    }
}
