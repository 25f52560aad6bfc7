//! Delimited file export for normalized measurement sets.
//!
//! Writes UTF-8 CSV with a fixed column order. Missing metrics render as
//! empty fields, never `0` or a `null` literal. The secondary mode appends a
//! user-profile section after the records, standing in for the second sheet
//! of a spreadsheet export.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::info;

use crate::record::MeasurementSet;

/// Fixed header row of the records section.
const HEADER: [&str; 5] = ["date", "datetime", "weight", "body_fat", "model"];

/// Header row of the optional profile section.
const PROFILE_HEADER: [&str; 3] = ["birth_date", "height", "sex"];

/// Errors from writing an export file.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Could not create the output file or its parent directory.
    #[error("failed to write output file: {0}")]
    Io(#[from] std::io::Error),
    /// The CSV encoder failed.
    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Returns the default export filename for the given local time,
/// `health_data_<YYYYMMDD_HHMMSS>.csv`.
pub fn default_filename(now: NaiveDateTime) -> String {
    format!("health_data_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

/// Writes the record set to `path` and returns the written path.
pub fn write_csv(set: &MeasurementSet, path: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
    write_delimited(set, path.as_ref(), false)
}

/// Like [`write_csv`], additionally appending the user-profile section.
///
/// The section is omitted when every profile field is empty.
pub fn write_csv_with_profile(
    set: &MeasurementSet,
    path: impl AsRef<Path>,
) -> Result<PathBuf, ExportError> {
    write_delimited(set, path.as_ref(), true)
}

fn write_delimited(
    set: &MeasurementSet,
    path: &Path,
    with_profile: bool,
) -> Result<PathBuf, ExportError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    // Flexible: the profile section has a different width than the records.
    let mut writer = csv::WriterBuilder::new().flexible(true).from_path(path)?;

    writer.write_record(HEADER)?;
    for record in &set.records {
        writer.write_record(&[
            record.date.format("%Y-%m-%d").to_string(),
            record.datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            record.weight.map(format_metric).unwrap_or_default(),
            record.body_fat.map(format_metric).unwrap_or_default(),
            record.model.clone(),
        ])?;
    }

    if with_profile && !set.profile.is_empty() {
        writer.write_record([""])?;
        writer.write_record(PROFILE_HEADER)?;
        writer.write_record(&[
            set.profile
                .formatted_birth_date()
                .or_else(|| set.profile.birth_date.clone())
                .unwrap_or_default(),
            set.profile.height.map(format_metric).unwrap_or_default(),
            set.profile
                .sex
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    info!("wrote {} record(s) to {}", set.records.len(), path.display());
    Ok(path.to_path_buf())
}

fn format_metric(value: f64) -> String {
    value.to_string()
}
