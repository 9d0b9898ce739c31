#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loads and cleans the incident CSV snapshot.
//!
//! The source file carries one row per incident with at least the columns
//! `category`, `date` (`"YYYY-MM"`), `lat`, and `long`. Rows missing either
//! coordinate are dropped and counted (documented policy, not a failure);
//! anything else malformed aborts the load. Day-of-month is assumed to be 1
//! since the source only records year-month granularity.

use std::path::Path;

use chrono::NaiveDate;
use hotspot_map_incident_models::Incident;
use thiserror::Error;

/// Column names required in the input file.
pub const REQUIRED_COLUMNS: &[&str] = &["category", "date", "lat", "long"];

/// Errors raised while loading the incident file.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed to open.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// CSV-level failure (bad quoting, uneven row lengths, ...).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row.
    #[error("missing required column '{column}' (have: {available})")]
    MissingColumn {
        /// The column that was not found.
        column: String,
        /// Comma-separated list of columns the file does have.
        available: String,
    },

    /// A `date` cell could not be parsed as `"YYYY-MM"`.
    #[error("row {row}: unparseable date '{value}' (expected YYYY-MM)")]
    BadDate {
        /// 1-based data row number (excluding the header).
        row: usize,
        /// The offending cell contents.
        value: String,
    },
}

/// Result of a successful load: the cleaned records plus drop accounting.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    /// Cleaned incidents, in file order.
    pub incidents: Vec<Incident>,
    /// Rows excluded for missing latitude or longitude.
    pub dropped_missing_coords: usize,
    /// Total data rows read from the file.
    pub total_rows: usize,
}

/// Loads the incident CSV at `path`, drops rows without coordinates, and
/// derives the temporal features for every surviving record.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a required column is
/// missing, or a `date` cell cannot be parsed. Missing coordinates are NOT
/// an error; those rows are dropped and counted in the outcome.
pub fn load_incidents(path: &Path) -> Result<LoadOutcome, IngestError> {
    let file = std::fs::File::open(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let mut reader = csv::Reader::from_reader(file);

    let headers = reader.headers()?.clone();
    let columns = resolve_columns(&headers)?;

    let mut incidents = Vec::new();
    let mut dropped = 0usize;
    let mut total = 0usize;

    for (i, result) in reader.records().enumerate() {
        let record = result?;
        total += 1;

        let lat = parse_coord(record.get(columns.lat));
        let lng = parse_coord(record.get(columns.lng));

        let (Some(lat), Some(lng)) = (lat, lng) else {
            dropped += 1;
            continue;
        };

        let raw_date = record.get(columns.date).unwrap_or("").trim();
        let date = parse_year_month(raw_date).ok_or_else(|| IngestError::BadDate {
            row: i + 1,
            value: raw_date.to_string(),
        })?;

        let category = record
            .get(columns.category)
            .unwrap_or("")
            .trim()
            .to_string();

        incidents.push(Incident::new(category, date, lat, lng));
    }

    log::info!(
        "Loaded {} incidents from {} ({} rows dropped for missing coordinates)",
        incidents.len(),
        path.display(),
        dropped
    );

    Ok(LoadOutcome {
        incidents,
        dropped_missing_coords: dropped,
        total_rows: total,
    })
}

/// Header indexes of the required columns.
struct ColumnIndexes {
    category: usize,
    date: usize,
    lat: usize,
    lng: usize,
}

fn resolve_columns(headers: &csv::StringRecord) -> Result<ColumnIndexes, IngestError> {
    let find = |name: &str| -> Result<usize, IngestError> {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| IngestError::MissingColumn {
                column: name.to_string(),
                available: headers.iter().collect::<Vec<_>>().join(", "),
            })
    };

    Ok(ColumnIndexes {
        category: find("category")?,
        date: find("date")?,
        lat: find("lat")?,
        lng: find("long")?,
    })
}

/// Parses a coordinate cell. Empty, whitespace, non-numeric, or non-finite
/// cells (`NaN`, `inf`) read as absent; a NaN coordinate must never reach
/// the projection or the spatial index.
fn parse_coord(cell: Option<&str>) -> Option<f64> {
    let trimmed = cell?.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a `"YYYY-MM"` string into a date with the day pinned to 1.
/// A full `"YYYY-MM-DD"` value is also accepted; its day is kept.
fn parse_year_month(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    let (year, month) = value.split_once('-')?;
    let year: i32 = year.trim().parse().ok()?;
    let month: u32 = month.trim().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use hotspot_map_incident_models::{Month, Season};

    use super::*;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn drops_rows_with_missing_coordinates() {
        let file = write_csv(
            "category,date,lat,long\n\
             burglary,2024-01,51.50,-0.12\n\
             robbery,2024-02,,-0.11\n\
             assault,2024-03,51.51,\n\
             theft,2024-04,51.52,-0.10\n",
        );

        let outcome = load_incidents(file.path()).unwrap();
        assert_eq!(outcome.total_rows, 4);
        assert_eq!(outcome.incidents.len(), 2);
        assert_eq!(outcome.dropped_missing_coords, 2);
        assert_eq!(
            outcome.total_rows,
            outcome.incidents.len() + outcome.dropped_missing_coords
        );
        // Every survivor has coordinates.
        for incident in &outcome.incidents {
            assert!(incident.lat.is_finite());
            assert!(incident.lng.is_finite());
        }
    }

    #[test]
    fn non_finite_coordinates_are_dropped() {
        let file = write_csv(
            "category,date,lat,long\n\
             burglary,2024-01,NaN,-0.12\n\
             robbery,2024-02,51.5,inf\n\
             assault,2024-03,51.5,-inf\n\
             theft,2024-04,51.5,-0.12\n",
        );

        let outcome = load_incidents(file.path()).unwrap();
        assert_eq!(outcome.incidents.len(), 1);
        assert_eq!(outcome.dropped_missing_coords, 3);
        assert!(outcome.incidents[0].lat.is_finite());
        assert!(outcome.incidents[0].lng.is_finite());
    }

    #[test]
    fn derives_month_and_season() {
        let file = write_csv("category,date,lat,long\nburglary,2024-07,51.5,-0.12\n");
        let outcome = load_incidents(file.path()).unwrap();
        let incident = &outcome.incidents[0];
        assert_eq!(incident.date, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        assert_eq!(incident.month, Month::Jul);
        assert_eq!(incident.season, Season::Summer);
    }

    #[test]
    fn missing_column_is_an_error() {
        let file = write_csv("category,when,lat,long\nburglary,2024-07,51.5,-0.12\n");
        let err = load_incidents(file.path()).unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { ref column, .. } if column == "date"));
    }

    #[test]
    fn malformed_date_is_an_error() {
        let file = write_csv("category,date,lat,long\nburglary,July 2024,51.5,-0.12\n");
        let err = load_incidents(file.path()).unwrap_err();
        assert!(matches!(err, IngestError::BadDate { row: 1, .. }));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_incidents(Path::new("/nonexistent/incidents.csv")).unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
    }

    #[test]
    fn full_dates_keep_their_day() {
        let file = write_csv("category,date,lat,long\nburglary,2024-07-15,51.5,-0.12\n");
        let outcome = load_incidents(file.path()).unwrap();
        assert_eq!(
            outcome.incidents[0].date,
            NaiveDate::from_ymd_opt(2024, 7, 15).unwrap()
        );
    }
}
