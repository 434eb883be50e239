use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::model::{CellValue, MeasurementTable, REQUIRED_COLUMNS};

// ---------------------------------------------------------------------------
// Missing marker
// ---------------------------------------------------------------------------

/// A cell that failed to parse into its column's type. Keeps the raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Missing {
    pub raw: String,
}

impl Missing {
    pub fn new(raw: &str) -> Self {
        Missing {
            raw: raw.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-column parsing
// ---------------------------------------------------------------------------

/// How the cells of a column are turned into [`CellValue`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Coerced to a date-time; failures become missing.
    Timestamp,
    /// Coerced to `f64`; failures become missing.
    Numeric,
    /// Type guessed per cell.
    Inferred,
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Tokens read as missing in every column, whatever its type.
pub const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_na_token(cell: &str) -> bool {
    NA_TOKENS.contains(&cell)
}

/// Parse a number. Empty, non-numeric and non-finite cells are missing.
pub fn parse_numeric(cell: &str) -> Result<f64, Missing> {
    match cell.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Missing::new(cell)),
    }
}

/// Parse a date-time. Offsets are normalised to UTC; bare dates are midnight.
pub fn parse_timestamp(cell: &str) -> Result<NaiveDateTime, Missing> {
    let s = cell.trim();
    if s.is_empty() {
        return Err(Missing::new(cell));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| Missing::new(cell))
}

/// Guess the type of a pass-through cell. NA tokens and non-finite
/// numbers are missing, so they never reach a correlation.
pub fn infer_cell(cell: &str) -> CellValue {
    if is_na_token(cell) {
        return CellValue::Missing(Missing::new(cell));
    }
    if let Ok(i) = cell.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = cell.parse::<f64>() {
        return if f.is_finite() {
            CellValue::Float(f)
        } else {
            CellValue::Missing(Missing::new(cell))
        };
    }
    if cell == "true" || cell == "false" {
        return CellValue::Bool(cell == "true");
    }
    CellValue::Text(cell.to_string())
}

pub fn coerce_cell(kind: ColumnKind, cell: &str) -> CellValue {
    match kind {
        ColumnKind::Timestamp => parse_timestamp(cell)
            .map(CellValue::Timestamp)
            .unwrap_or_else(CellValue::Missing),
        ColumnKind::Numeric => parse_numeric(cell)
            .map(CellValue::Float)
            .unwrap_or_else(CellValue::Missing),
        ColumnKind::Inferred => infer_cell(cell),
    }
}

// ---------------------------------------------------------------------------
// Missing-value policy
// ---------------------------------------------------------------------------

/// What happens to rows whose Timestamp or GHI failed to parse.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    /// Remove the row from every view.
    #[default]
    Drop,
    /// Keep the row; the bad cells stay as missing markers.
    Retain,
}

impl MissingPolicy {
    /// Apply the policy, returning the surviving table and the number of dropped rows.
    pub fn apply(self, table: MeasurementTable) -> (MeasurementTable, usize) {
        match self {
            MissingPolicy::Retain => (table, 0),
            MissingPolicy::Drop => {
                let required: Vec<usize> = REQUIRED_COLUMNS
                    .iter()
                    .filter_map(|c| table.column_index(c))
                    .collect();
                let before = table.rows.len();
                let MeasurementTable { column_names, rows } = table;
                let rows: Vec<_> = rows
                    .into_iter()
                    .filter(|row| required.iter().all(|&c| !row[c].is_missing()))
                    .collect();
                let dropped = before - rows.len();
                (MeasurementTable::new(column_names, rows), dropped)
            }
        }
    }
}
