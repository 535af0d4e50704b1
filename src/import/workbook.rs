//! Spreadsheet reader
//!
//! Reads the first sheet of the schedule workbook. The first row holds the
//! column names; every later row becomes a [`ScheduleRow`].

use super::{ScheduleRow, TextCell, TimeCell};
use crate::error::{LabCheckError, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use log::{debug, info};
use serde_json::Value;
use std::path::Path;

const WORKBOOK_EXTENSIONS: [&str; 5] = ["xls", "xlsx", "xlsm", "xlsb", "ods"];

/// Returns true when `path` names a spreadsheet rather than a JSON export
pub fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            WORKBOOK_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Read every data row of the workbook's first sheet.
pub fn read_workbook(path: &Path) -> Result<Vec<ScheduleRow>> {
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        LabCheckError::import(format!("cannot open {}: {}", path.display(), e))
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LabCheckError::import(format!("{} has no sheets", path.display())))?
        .map_err(|e| {
            LabCheckError::import(format!("cannot read {}: {}", path.display(), e))
        })?;

    let rows = rows_from_range(&range)?;
    info!("Read {} row(s) from {:?}", rows.len(), path);
    Ok(rows)
}

/// Position of each named column in the header row.
///
/// Only `nama_matakuliah` may be absent.
struct Columns {
    hari: usize,
    ruang: usize,
    jam_mulai: usize,
    jam_selesai: usize,
    nama_matakuliah: Option<usize>,
}

impl Columns {
    fn from_header(header: &[Data]) -> Result<Self> {
        let names: Vec<String> = header
            .iter()
            .map(|cell| cell.to_string().trim().to_lowercase())
            .collect();
        debug!("Sheet columns: {:?}", names);
        let find = |name: &str| names.iter().position(|n| n == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| {
                LabCheckError::import(format!(
                    "sheet has no '{}' column (found: {})",
                    name,
                    names.join(", ")
                ))
            })
        };

        Ok(Self {
            hari: require("hari")?,
            ruang: require("ruang")?,
            jam_mulai: require("jam_mulai")?,
            jam_selesai: require("jam_selesai")?,
            nama_matakuliah: find("nama_matakuliah"),
        })
    }

    fn row(&self, cells: &[Data]) -> ScheduleRow {
        let cell = |idx: usize| cells.get(idx).unwrap_or(&Data::Empty);
        ScheduleRow {
            hari: text_cell(cell(self.hari)),
            ruang: text_cell(cell(self.ruang)),
            jam_mulai: time_cell(cell(self.jam_mulai)),
            jam_selesai: time_cell(cell(self.jam_selesai)),
            nama_matakuliah: self.nama_matakuliah.and_then(|idx| text_cell(cell(idx))),
        }
    }
}

/// Convert a sheet (header row first) into schedule rows.
pub(super) fn rows_from_range(range: &Range<Data>) -> Result<Vec<ScheduleRow>> {
    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| LabCheckError::import("sheet is empty"))?;
    let columns = Columns::from_header(header)?;

    Ok(rows.map(|cells| columns.row(cells)).collect())
}

fn time_cell(cell: &Data) -> Option<TimeCell> {
    match cell {
        Data::Empty => None,
        Data::Float(f) => Some(TimeCell::Fraction(*f)),
        Data::Int(i) => Some(TimeCell::Fraction(*i as f64)),
        // Native time cells; any date part is ignored
        Data::DateTime(dt) => Some(TimeCell::Fraction(dt.as_f64().fract())),
        Data::DateTimeIso(s) => {
            let time = s.rsplit('T').next().unwrap_or(s.as_str());
            Some(TimeCell::Text(time.to_string()))
        }
        Data::String(s) => Some(TimeCell::Text(s.clone())),
        other => Some(TimeCell::Other(Value::String(other.to_string()))),
    }
}

fn text_cell(cell: &Data) -> Option<TextCell> {
    match cell {
        Data::Empty => None,
        other => Some(TextCell::Text(other.to_string())),
    }
}
