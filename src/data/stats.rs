use std::fmt;

use super::model::{MeasurementTable, GHI_COLUMN};

/// Result of correlating a column with GHI.
#[derive(Debug, Clone, PartialEq)]
pub enum Correlation {
    /// Pearson coefficient in `[-1, 1]`.
    Coefficient(f64),
    /// Both columns are numeric but there are fewer than two complete pairs,
    /// or one side has zero variance.
    Undefined,
    /// The column is absent or not numeric.
    NotApplicable { column: String, reason: String },
}

impl Correlation {
    pub fn coefficient(&self) -> Option<f64> {
        match self {
            Correlation::Coefficient(r) => Some(*r),
            _ => None,
        }
    }
}

impl fmt::Display for Correlation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Correlation::Coefficient(r) => write!(f, "{r:.4}"),
            Correlation::Undefined => {
                write!(f, "undefined (needs two or more non-constant values)")
            }
            Correlation::NotApplicable { column, reason } => {
                write!(f, "not applicable: '{column}' {reason}")
            }
        }
    }
}

/// Pearson correlation over complete pairs; `None` when degenerate.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for &(x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if !(cov.is_finite() && var_x.is_finite() && var_y.is_finite()) {
        return None;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// Correlate `column` with GHI over the rows where both are present.
pub fn compute_correlation(table: &MeasurementTable, column: &str) -> Correlation {
    let not_applicable = |reason: &str| Correlation::NotApplicable {
        column: column.to_string(),
        reason: reason.to_string(),
    };

    if table.column_index(column).is_none() {
        return not_applicable("is not a column of the table");
    }
    let Some(values) = table.numeric_column(column) else {
        return not_applicable("is not numeric");
    };
    let Some(ghi) = table.numeric_column(GHI_COLUMN) else {
        return not_applicable("cannot be compared: GHI has no numeric values");
    };

    let pairs: Vec<(f64, f64)> = values
        .into_iter()
        .zip(ghi)
        .filter_map(|(x, y)| Some((x?, y?)))
        .collect();
    pearson(&pairs).map_or(Correlation::Undefined, Correlation::Coefficient)
}

/// Correlation of every numeric column with GHI, in column order.
pub fn correlation_table(table: &MeasurementTable) -> Vec<(String, Correlation)> {
    table
        .column_names
        .iter()
        .filter(|name| table.is_numeric(name))
        .map(|name| (name.clone(), compute_correlation(table, name)))
        .collect()
}
