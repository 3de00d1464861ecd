//! CSV file series adapter.
//!
//! Each series lives in `<base_path>/<name>.csv` with a `date,value` header
//! and `YYYY-MM-DD` dates.

use crate::domain::error::FoliolabError;
use crate::domain::series::{TimeSeriesPoint, ValueSeries};
use crate::ports::series_port::SeriesPort;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

pub struct CsvSeriesAdapter {
    base_path: PathBuf,
}

impl CsvSeriesAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, name: &str) -> PathBuf {
        self.base_path.join(format!("{name}.csv"))
    }
}

/// Read a `date,value` CSV file into a validated series.
pub fn read_series_file(path: &Path) -> Result<ValueSeries<NaiveDate>, FoliolabError> {
    let content = fs::read_to_string(path).map_err(|e| FoliolabError::Data {
        reason: format!("failed to read {}: {}", path.display(), e),
    })?;

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());
    let mut points = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| FoliolabError::Data {
            reason: format!("CSV parse error: {}", e),
        })?;

        let date_str = record.get(0).ok_or_else(|| FoliolabError::Data {
            reason: format!("row {}: missing date column", row + 1),
        })?;
        let timestamp = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
            FoliolabError::Data {
                reason: format!("row {}: invalid date '{}': {}", row + 1, date_str, e),
            }
        })?;

        let value: f64 = record
            .get(1)
            .ok_or_else(|| FoliolabError::Data {
                reason: format!("row {}: missing value column", row + 1),
            })?
            .parse()
            .map_err(|e| FoliolabError::Data {
                reason: format!("row {}: invalid value: {}", row + 1, e),
            })?;

        points.push(TimeSeriesPoint { timestamp, value });
    }

    points.sort_by_key(|p| p.timestamp);
    ValueSeries::new(points)
}

impl SeriesPort for CsvSeriesAdapter {
    fn load_series(&self, name: &str) -> Result<ValueSeries<NaiveDate>, FoliolabError> {
        read_series_file(&self.csv_path(name))
    }

    fn list_series(&self) -> Result<Vec<String>, FoliolabError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| FoliolabError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FoliolabError::Data {
                reason: format!("directory entry error: {}", e),
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "csv") {
                if let Some(stem) = path.file_stem() {
                    names.push(stem.to_string_lossy().into_owned());
                }
            }
        }

        names.sort();
        Ok(names)
    }
}
