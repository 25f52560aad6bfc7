//! Core types: samples, daily records, normalization, summary, export

pub mod export;
pub mod normalize;
pub mod record;
pub mod summary;

pub use export::{ExportError, default_filename, write_csv, write_csv_with_profile};
pub use normalize::normalize;
pub use record::{DailyRecord, MeasurementSet, MeasurementTag, RawSample, Sex, UserProfile};
pub use summary::{MetricSummary, Summary};
