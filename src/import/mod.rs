//! One-time schedule import
//!
//! Converts the schedule spreadsheet (the workbook itself, or a JSON export of
//! its rows) into the `jadwal` table read by
//! [`SqliteStore`](crate::store::SqliteStore).
//!
//! # Module Structure
//! - `workbook` - Reading `.xls`/`.xlsx`/`.ods` sheets into rows
//! - Main module - Row normalization and the table write
//!
//! # Normalization
//!
//! - Time cells may be spreadsheet day fractions (`0.375`), `HH:MM` or
//!   `HH:MM:SS` strings; all are stored as zero-padded `HH:MM`
//! - Text cells are trimmed but keep their case
//! - Rows with a missing or unreadable time, a missing day or room, or a
//!   start that is not before the end are skipped with a warning

use crate::error::{LabCheckError, Result};
use crate::store::TABLE_NAME;
use crate::types::{ClockTime, OccupationRecord};
use log::{info, warn};
use rusqlite::{params, Connection};
use serde::Deserialize;
use std::fs;
use std::path::Path;

mod workbook;

pub use workbook::{is_workbook, read_workbook};

/// A time cell as exported from the spreadsheet
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TimeCell {
    Fraction(f64),
    Text(String),
    /// Booleans, arrays and objects; never a valid time
    Other(serde_json::Value),
}

impl TimeCell {
    fn to_clock_time(&self) -> Option<ClockTime> {
        match self {
            Self::Fraction(f) => ClockTime::from_day_fraction(*f),
            Self::Text(s) if s.contains(':') => s.parse().ok(),
            Self::Text(_) | Self::Other(_) => None,
        }
    }
}

/// A text cell; numeric cells are kept as their printed value
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextCell {
    Text(String),
    Number(serde_json::Number),
    Other(serde_json::Value),
}

impl TextCell {
    fn into_trimmed(self) -> String {
        match self {
            Self::Text(s) => s.trim().to_string(),
            Self::Number(n) => n.to_string(),
            Self::Other(_) => String::new(),
        }
    }
}

/// One row of the spreadsheet export
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleRow {
    pub hari: Option<TextCell>,
    pub ruang: Option<TextCell>,
    pub jam_mulai: Option<TimeCell>,
    pub jam_selesai: Option<TimeCell>,
    pub nama_matakuliah: Option<TextCell>,
}

/// Why a row was left out of the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingDay,
    MissingRoom,
    BadStartTime,
    BadEndTime,
    EmptyInterval { start: ClockTime, end: ClockTime },
}

impl ScheduleRow {
    /// Normalize the row into a record, or say why it cannot be stored.
    pub fn normalize(self) -> std::result::Result<OccupationRecord, SkipReason> {
        let start_time = self
            .jam_mulai
            .as_ref()
            .and_then(TimeCell::to_clock_time)
            .ok_or(SkipReason::BadStartTime)?;
        let end_time = self
            .jam_selesai
            .as_ref()
            .and_then(TimeCell::to_clock_time)
            .ok_or(SkipReason::BadEndTime)?;

        let day = self
            .hari
            .map(TextCell::into_trimmed)
            .filter(|d| !d.is_empty())
            .ok_or(SkipReason::MissingDay)?;
        let room = self
            .ruang
            .map(TextCell::into_trimmed)
            .filter(|r| !r.is_empty())
            .ok_or(SkipReason::MissingRoom)?;
        let course_name = self
            .nama_matakuliah
            .map(TextCell::into_trimmed)
            .unwrap_or_default();

        let record = OccupationRecord {
            day,
            room,
            start_time,
            end_time,
            course_name,
        };
        if !record.is_well_formed() {
            return Err(SkipReason::EmptyInterval {
                start: start_time,
                end: end_time,
            });
        }
        Ok(record)
    }
}

/// Counts reported after an import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportReport {
    pub rows_read: usize,
    pub rows_imported: usize,
    pub rows_skipped: usize,
}

/// Parse the JSON export and keep the rows that normalize cleanly.
pub fn normalize_rows(json: &str) -> Result<(Vec<OccupationRecord>, ImportReport)> {
    let rows: Vec<ScheduleRow> = serde_json::from_str(json)?;
    Ok(normalize_all(rows))
}

/// Keep the rows that normalize cleanly and count the rest.
pub fn normalize_all(rows: Vec<ScheduleRow>) -> (Vec<OccupationRecord>, ImportReport) {
    let mut report = ImportReport {
        rows_read: rows.len(),
        ..ImportReport::default()
    };

    let mut records = Vec::with_capacity(rows.len());
    for (idx, row) in rows.into_iter().enumerate() {
        match row.normalize() {
            Ok(record) => records.push(record),
            Err(reason) => {
                // Row numbers are 1-based, as in the spreadsheet
                warn!("Skipping schedule row {}: {:?}", idx + 1, reason);
                report.rows_skipped += 1;
            }
        }
    }
    report.rows_imported = records.len();
    (records, report)
}

/// Replace the schedule table in `database` with `records`.
///
/// Runs in one transaction; a failure leaves the previous table in place.
pub fn write_records(database: &Path, records: &[OccupationRecord]) -> Result<()> {
    let mut conn = Connection::open(database)?;
    let tx = conn.transaction()?;

    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS {TABLE_NAME};
         CREATE TABLE {TABLE_NAME} (
             hari TEXT NOT NULL,
             ruang TEXT NOT NULL,
             jam_mulai_hhmm TEXT NOT NULL,
             jam_selesai_hhmm TEXT NOT NULL,
             nama_matakuliah TEXT NOT NULL
         );"
    ))?;

    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {TABLE_NAME}
                 (hari, ruang, jam_mulai_hhmm, jam_selesai_hhmm, nama_matakuliah)
             VALUES (?1, ?2, ?3, ?4, ?5)"
        ))?;
        for r in records {
            stmt.execute(params![
                r.day,
                r.room,
                r.start_time.to_string(),
                r.end_time.to_string(),
                r.course_name
            ])?;
        }
    }

    tx.execute_batch(&format!(
        "CREATE INDEX idx_hari_ruang ON {TABLE_NAME} (hari, ruang);"
    ))?;
    tx.commit()?;
    Ok(())
}

/// Import the schedule at `input` (a workbook, or a JSON export of its rows)
/// into the SQLite `database`.
pub fn import_schedule(input: &Path, database: &Path) -> Result<ImportReport> {
    info!("Importing schedule from {:?} into {:?}", input, database);

    let (records, report) = if is_workbook(input) {
        normalize_all(read_workbook(input)?)
    } else {
        let json = fs::read_to_string(input).map_err(|e| {
            LabCheckError::import(format!("cannot read {}: {}", input.display(), e))
        })?;
        normalize_rows(&json)?
    };
    if records.is_empty() {
        return Err(LabCheckError::import(format!(
            "{} contains no usable schedule rows",
            input.display()
        )));
    }

    write_records(database, &records)?;
    info!(
        "Imported {} of {} row(s) ({} skipped)",
        report.rows_imported, report.rows_read, report.rows_skipped
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(json: &str) -> ScheduleRow {
        serde_json::from_str(json).expect("row json")
    }

    #[test]
    fn test_fraction_and_text_times() {
        let record = row(r#"{
            "hari": " Senin ", "ruang": "Software I ",
            "jam_mulai": 0.3333333, "jam_selesai": "10:00:00",
            "nama_matakuliah": " Struktur Data"
        }"#)
        .normalize()
        .expect("normalize");

        assert_eq!(record.day, "Senin");
        assert_eq!(record.room, "Software I");
        assert_eq!(record.start_time.to_string(), "08:00");
        assert_eq!(record.end_time.to_string(), "10:00");
        assert_eq!(record.course_name, "Struktur Data");
    }

    #[test]
    fn test_case_is_preserved() {
        let record = row(r#"{
            "hari": "SENIN", "ruang": "lab jaringan",
            "jam_mulai": "7:30", "jam_selesai": "9:10", "nama_matakuliah": "x"
        }"#)
        .normalize()
        .expect("normalize");
        assert_eq!(record.day, "SENIN");
        assert_eq!(record.room, "lab jaringan");
        assert_eq!(record.start_time.to_string(), "07:30");
    }

    #[test]
    fn test_missing_time_is_skipped() {
        let reason = row(r#"{ "hari": "Senin", "ruang": "A", "jam_mulai": null,
                              "jam_selesai": "10:00", "nama_matakuliah": "x" }"#)
        .normalize()
        .unwrap_err();
        assert_eq!(reason, SkipReason::BadStartTime);

        let reason = row(r#"{ "hari": "Senin", "ruang": "A", "jam_mulai": "08:00",
                              "jam_selesai": "sepuluh", "nama_matakuliah": "x" }"#)
        .normalize()
        .unwrap_err();
        assert_eq!(reason, SkipReason::BadEndTime);
    }

    #[test]
    fn test_odd_cell_types_skip_only_their_row() {
        let (records, report) = normalize_rows(
            r#"[
                { "hari": "Senin", "ruang": "A", "jam_mulai": "08:00",
                  "jam_selesai": "10:00", "nama_matakuliah": "Struktur Data" },
                { "hari": "Senin", "ruang": "A", "jam_mulai": true,
                  "jam_selesai": "10:00", "nama_matakuliah": "x" },
                { "hari": "Selasa", "ruang": ["A"], "jam_mulai": "08:00",
                  "jam_selesai": {"h": 10}, "nama_matakuliah": "y" },
                { "hari": {"nama": "Rabu"}, "ruang": "B", "jam_mulai": "08:00",
                  "jam_selesai": "09:00", "nama_matakuliah": false }
            ]"#,
        )
        .expect("odd cells must not abort the import");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].course_name, "Struktur Data");
        assert_eq!(
            report,
            ImportReport {
                rows_read: 4,
                rows_imported: 1,
                rows_skipped: 3,
            }
        );
    }

    #[test]
    fn test_inverted_interval_is_skipped() {
        let reason = row(r#"{ "hari": "Senin", "ruang": "A", "jam_mulai": "10:00",
                              "jam_selesai": "08:00", "nama_matakuliah": "x" }"#)
        .normalize()
        .unwrap_err();
        assert!(matches!(reason, SkipReason::EmptyInterval { .. }));
    }

    #[test]
    fn test_numeric_room_name() {
        let record = row(r#"{ "hari": "Rabu", "ruang": 204, "jam_mulai": "08:00",
                              "jam_selesai": "09:00", "nama_matakuliah": "x" }"#)
        .normalize()
        .expect("normalize");
        assert_eq!(record.room, "204");
    }

    #[test]
    fn test_normalize_rows_counts() {
        let (records, report) = normalize_rows(
            r#"[
                { "hari": "Senin", "ruang": "A", "jam_mulai": "08:00",
                  "jam_selesai": "09:00", "nama_matakuliah": "x" },
                { "hari": "Senin", "ruang": "A", "jam_mulai": null,
                  "jam_selesai": "09:00", "nama_matakuliah": "y" }
            ]"#,
        )
        .expect("rows");
        assert_eq!(records.len(), 1);
        assert_eq!(
            report,
            ImportReport {
                rows_read: 2,
                rows_imported: 1,
                rows_skipped: 1
            }
        );
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            normalize_rows("{ not json"),
            Err(LabCheckError::Json(_))
        ));
    }
}
