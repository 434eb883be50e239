use super::model::{MeasurementTable, GHI_COLUMN};

// ---------------------------------------------------------------------------
// GHI range filter
// ---------------------------------------------------------------------------

/// Inclusive GHI bounds selected by the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhiRange {
    pub low: f64,
    pub high: f64,
}

impl GhiRange {
    pub fn new(low: f64, high: f64) -> Self {
        GhiRange { low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }
}

/// Slider state: the observed GHI bounds plus the current selection.
///
/// Invariant: `min <= range.low <= range.high <= max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeFilter {
    pub min: f64,
    pub max: f64,
    range: GhiRange,
}

impl RangeFilter {
    /// Full-range filter over the observed GHI values; `None` if there are none.
    pub fn from_table(table: &MeasurementTable) -> Option<Self> {
        let (min, max) = table.numeric_bounds(GHI_COLUMN)?;
        Some(RangeFilter {
            min,
            max,
            range: GhiRange::new(min, max),
        })
    }

    pub fn range(&self) -> GhiRange {
        self.range
    }

    /// Move the lower bound; the upper bound follows if it would be crossed.
    pub fn set_low(&mut self, low: f64) {
        let low = self.clamp(low);
        self.range.low = low;
        self.range.high = self.range.high.max(low);
    }

    /// Move the upper bound; the lower bound follows if it would be crossed.
    pub fn set_high(&mut self, high: f64) {
        let high = self.clamp(high);
        self.range.high = high;
        self.range.low = self.range.low.min(high);
    }

    pub fn reset(&mut self) {
        self.range = GhiRange::new(self.min, self.max);
    }

    fn clamp(&self, v: f64) -> f64 {
        if v.is_nan() {
            self.min
        } else {
            v.clamp(self.min, self.max)
        }
    }
}

/// Indices of rows whose GHI lies in `range`, in table order.
/// Rows with a missing GHI never pass.
pub fn filtered_indices(table: &MeasurementTable, range: GhiRange) -> Vec<usize> {
    let Some(col) = table.column_index(GHI_COLUMN) else {
        return Vec::new();
    };
    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row[col].as_f64().is_some_and(|v| range.contains(v)))
        .map(|(i, _)| i)
        .collect()
}

/// Rows with GHI in `[low, high]`, as a new table. Empty when `low > high`.
pub fn filter_by_range(table: &MeasurementTable, low: f64, high: f64) -> MeasurementTable {
    table.select_rows(&filtered_indices(table, GhiRange::new(low, high)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::coerce::{coerce_cell, ColumnKind, MissingPolicy};
    use crate::data::model::CellValue;

    fn table(ghi: &[&str]) -> MeasurementTable {
        MeasurementTable::new(
            vec!["Timestamp".into(), "GHI".into()],
            ghi.iter()
                .enumerate()
                .map(|(i, g)| {
                    vec![
                        coerce_cell(ColumnKind::Timestamp, &format!("2021-08-09 00:{i:02}")),
                        coerce_cell(ColumnKind::Numeric, g),
                    ]
                })
                .collect(),
        )
    }

    fn ghi(t: &MeasurementTable) -> Vec<f64> {
        (0..t.len())
            .filter_map(|i| t.cell(i, "GHI").and_then(CellValue::as_f64))
            .collect()
    }

    #[test]
    fn filter_is_inclusive_and_order_preserving() {
        let t = table(&["50", "300", "100", "200", "301"]);
        assert_eq!(ghi(&filter_by_range(&t, 100.0, 300.0)), [300.0, 100.0, 200.0]);
        assert_eq!(filtered_indices(&t, GhiRange::new(100.0, 300.0)), [1, 2, 3]);
    }

    #[test]
    fn full_range_keeps_every_non_missing_row() {
        let t = table(&["5", "N/A", "-3", "", "12"]);
        let filter = RangeFilter::from_table(&t).unwrap();
        assert_eq!((filter.min, filter.max), (-3.0, 12.0));
        let r = filter.range();
        assert_eq!(ghi(&filter_by_range(&t, r.low, r.high)), [5.0, -3.0, 12.0]);
    }

    #[test]
    fn inverted_range_is_empty() {
        let t = table(&["1", "2"]);
        assert!(filter_by_range(&t, 2.0, 1.0).is_empty());
    }

    #[test]
    fn no_ghi_values_means_no_filter() {
        assert_eq!(RangeFilter::from_table(&table(&["x", ""])), None);
    }

    #[test]
    fn setters_keep_bounds_ordered_and_clamped() {
        let mut f = RangeFilter::from_table(&table(&["0", "1000"])).unwrap();
        f.set_low(-50.0);
        assert_eq!(f.range(), GhiRange::new(0.0, 1000.0));
        f.set_high(400.0);
        f.set_low(600.0);
        assert_eq!(f.range(), GhiRange::new(600.0, 600.0));
        f.set_high(2000.0);
        f.set_high(100.0);
        assert_eq!(f.range(), GhiRange::new(100.0, 100.0));
        f.reset();
        assert_eq!(f.range(), GhiRange::new(0.0, 1000.0));
    }

    #[test]
    fn three_row_scenario() {
        let raw = MeasurementTable::new(
            vec!["Timestamp".into(), "GHI".into()],
            vec![
                vec![
                    coerce_cell(ColumnKind::Timestamp, "2021-08-09 00:01"),
                    coerce_cell(ColumnKind::Numeric, "100"),
                ],
                vec![
                    coerce_cell(ColumnKind::Timestamp, "bad"),
                    coerce_cell(ColumnKind::Numeric, "bad"),
                ],
                vec![
                    coerce_cell(ColumnKind::Timestamp, "2021-08-09 00:03"),
                    coerce_cell(ColumnKind::Numeric, "300"),
                ],
            ],
        );
        assert!(raw.cell(1, "GHI").unwrap().is_missing());

        let (cleaned, dropped) = MissingPolicy::Drop.apply(raw);
        assert_eq!(dropped, 1);
        let filtered = filter_by_range(&cleaned, 100.0, 300.0);
        assert_eq!(filtered, cleaned);
        assert_eq!(ghi(&filtered), [100.0, 300.0]);
    }
}
