use std::fmt;

use chrono::NaiveDateTime;

use super::coerce::Missing;

/// Column holding the measurement time.
pub const TIMESTAMP_COLUMN: &str = "Timestamp";
/// Global Horizontal Irradiance, W/m².
pub const GHI_COLUMN: &str = "GHI";
/// Direct Normal Irradiance, W/m².
pub const DNI_COLUMN: &str = "DNI";

/// Columns a measurement table cannot be used without.
pub const REQUIRED_COLUMNS: [&str; 2] = [TIMESTAMP_COLUMN, GHI_COLUMN];

// ---------------------------------------------------------------------------
// CellValue – a single cell of the measurement table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value.
///
/// Coerced columns (Timestamp, GHI, DNI) only ever hold their target type or
/// [`CellValue::Missing`]; every other column is type-guessed per cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Timestamp(NaiveDateTime),
    Missing(Missing),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Timestamp(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Missing(_) => write!(f, "<missing>"),
        }
    }
}

impl CellValue {
    /// Numeric view of the cell, used for filtering and correlation.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing(_))
    }
}

// ---------------------------------------------------------------------------
// MeasurementTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Row-major measurement table. Every row has exactly `column_names.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementTable {
    /// Column names in source order.
    pub column_names: Vec<String>,
    /// Rows in source order.
    pub rows: Vec<Vec<CellValue>>,
}

impl MeasurementTable {
    pub fn new(column_names: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        MeasurementTable { column_names, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.column_names.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names.iter().position(|c| c == name)
    }

    /// Cell at `(row, column name)`, if both exist.
    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.get(col)
    }

    /// Numeric values of a column, `None` per missing cell.
    ///
    /// Returns `None` for the whole column unless it is numeric: at least one
    /// integer/float cell and no text, bool or timestamp cells.
    pub fn numeric_column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let col = self.column_index(name)?;
        let mut values = Vec::with_capacity(self.rows.len());
        let mut seen_number = false;
        for row in &self.rows {
            match &row[col] {
                CellValue::Missing(_) => values.push(None),
                cell => {
                    let v = cell.as_f64()?;
                    seen_number = true;
                    values.push(Some(v));
                }
            }
        }
        seen_number.then_some(values)
    }

    pub fn is_numeric(&self, name: &str) -> bool {
        self.numeric_column(name).is_some()
    }

    /// Observed `(min, max)` over the non-missing numeric cells of a column.
    pub fn numeric_bounds(&self, name: &str) -> Option<(f64, f64)> {
        let col = self.column_index(name)?;
        self.rows
            .iter()
            .filter_map(|row| row[col].as_f64())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// New table holding the given rows, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> MeasurementTable {
        MeasurementTable {
            column_names: self.column_names.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing(raw: &str) -> CellValue {
        CellValue::Missing(Missing::new(raw))
    }

    fn sample() -> MeasurementTable {
        MeasurementTable::new(
            vec!["GHI".into(), "Label".into(), "Count".into()],
            vec![
                vec![CellValue::Float(10.0), CellValue::Text("a".into()), CellValue::Integer(1)],
                vec![missing("N/A"), CellValue::Text("b".into()), missing("")],
                vec![CellValue::Float(-2.5), CellValue::Text("c".into()), CellValue::Integer(3)],
            ],
        )
    }

    #[test]
    fn numeric_column_keeps_missing_positions() {
        let table = sample();
        assert_eq!(
            table.numeric_column("GHI"),
            Some(vec![Some(10.0), None, Some(-2.5)])
        );
        assert_eq!(
            table.numeric_column("Count"),
            Some(vec![Some(1.0), None, Some(3.0)])
        );
    }

    #[test]
    fn text_and_unknown_columns_are_not_numeric() {
        let table = sample();
        assert!(!table.is_numeric("Label"));
        assert!(!table.is_numeric("Nope"));
    }

    #[test]
    fn all_missing_column_is_not_numeric() {
        let table = MeasurementTable::new(
            vec!["X".into()],
            vec![vec![missing("a")], vec![missing("b")]],
        );
        assert!(!table.is_numeric("X"));
    }

    #[test]
    fn bounds_skip_missing_cells() {
        assert_eq!(sample().numeric_bounds("GHI"), Some((-2.5, 10.0)));
        assert_eq!(MeasurementTable::default().numeric_bounds("GHI"), None);
    }

    #[test]
    fn select_rows_preserves_requested_order() {
        let picked = sample().select_rows(&[2, 0, 7]);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked.cell(0, "Label"), Some(&CellValue::Text("c".into())));
        assert_eq!(picked.cell(1, "Label"), Some(&CellValue::Text("a".into())));
    }
}
