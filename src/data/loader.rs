use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, ExcelDateTime, ExcelDateTimeType, Reader};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use super::model::{CellValue, Grid};
use super::reducer::parse_date;

/// Extensions accepted by the file picker and drag-and-drop.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xls"];

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("workbook has no sheets")]
    NoSheets,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Whether `name` ends in a supported spreadsheet extension.
pub fn is_supported(name: &str) -> bool {
    extension(name).is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Read a spreadsheet from disk and return its first sheet as a grid.
pub fn load_file(path: &Path) -> Result<Grid, LoadError> {
    let name = path.to_string_lossy();
    check_extension(&name)?;
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_bytes(&name, bytes)
}

/// Parse in-memory spreadsheet bytes (e.g. a dropped file without a path).
pub fn load_bytes(name: &str, bytes: impl Into<Vec<u8>>) -> Result<Grid, LoadError> {
    check_extension(name)?;
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.into()))?;
    let range = workbook.worksheet_range_at(0).ok_or(LoadError::NoSheets)??;

    // Keep positions absolute when the used range does not start at A1.
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); row_offset];
    for source in range.rows() {
        let mut row: Vec<CellValue> = vec![CellValue::Empty; col_offset];
        row.extend(source.iter().map(convert_cell));
        while matches!(row.last(), Some(CellValue::Empty)) {
            row.pop();
        }
        rows.push(row);
    }
    Ok(Grid::new(rows))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

fn check_extension(name: &str) -> Result<(), LoadError> {
    if is_supported(name) {
        Ok(())
    } else {
        Err(LoadError::UnsupportedExtension(
            extension(name).unwrap_or_default(),
        ))
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(e) => CellValue::Text(e.to_string()),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            // calamine 0.32 keeps `is_1904` private; recover it via the derived PartialEq.
            let kind = if dt.is_duration() {
                ExcelDateTimeType::TimeDelta
            } else {
                ExcelDateTimeType::DateTime
            };
            let is_1904 = *dt == ExcelDateTime::new(serial, kind, true);
            serial_to_datetime(serial, is_1904)
                .map(CellValue::Date)
                .unwrap_or(CellValue::Number(serial))
        }
        Data::DateTimeIso(s) => parse_date(s)
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// Convert an Excel serial to a date-time.
///
/// 1900-system serials below 60 sit before the phantom 1900-02-29 and are
/// shifted by a day. 1904-system serials count from 1904-01-01.
fn serial_to_datetime(serial: f64, is_1904: bool) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let mut days = serial.trunc() as i64;
    let epoch = if is_1904 {
        NaiveDate::from_ymd_opt(1904, 1, 1)?
    } else {
        if days < 60 {
            days += 1;
        }
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    let seconds = ((serial.fract()) * 86_400.0).round() as i64;
    let epoch = epoch.and_hms_opt(0, 0, 0)?;
    epoch
        .checked_add_signed(TimeDelta::try_days(days)?)?
        .checked_add_signed(TimeDelta::try_seconds(seconds)?)
}
