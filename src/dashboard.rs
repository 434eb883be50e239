use chrono::NaiveDateTime;

use crate::config::DashboardConfig;
use crate::data::filter::{filter_by_range, GhiRange, RangeFilter};
use crate::data::model::{MeasurementTable, DNI_COLUMN, GHI_COLUMN, TIMESTAMP_COLUMN};
use crate::data::stats::{compute_correlation, correlation_table, Correlation};

pub const TITLE: &str = "Data Insights Dashboard";
pub const DEPLOY_MESSAGE: &str = "Deploy clicked: the dashboard is ready to share. Nothing was deployed.";

// ---------------------------------------------------------------------------
// Controls – everything the user can change
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardControls {
    /// `None` when the table has no GHI values to build a slider from.
    pub range: Option<RangeFilter>,
    pub show_time_series: bool,
    pub overlay_dni: bool,
    pub correlation_column: Option<String>,
    pub deployed: bool,
}

impl DashboardControls {
    /// Initial control values for a freshly loaded table: full GHI range,
    /// first column selected for correlation.
    pub fn initial(table: &MeasurementTable, config: &DashboardConfig) -> Self {
        DashboardControls {
            range: RangeFilter::from_table(table),
            show_time_series: config.show_time_series,
            overlay_dni: false,
            correlation_column: table.column_names.first().cloned(),
            deployed: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// Row/column counts plus the first rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub rows: usize,
    pub columns: usize,
    pub preview: MeasurementTable,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

/// Everything the UI draws, derived from the raw table and the controls.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub summary: Summary,
    pub range: Option<GhiRange>,
    /// Rows of the raw table passing the GHI range, in table order.
    pub filtered: MeasurementTable,
    pub ghi_series: Option<Vec<SeriesPoint>>,
    pub dni_series: Option<Vec<SeriesPoint>>,
    pub correlation: Option<(String, Correlation)>,
    pub correlation_overview: Vec<(String, Correlation)>,
    pub deploy_message: Option<&'static str>,
}

pub fn summarize(table: &MeasurementTable, preview_rows: usize) -> Summary {
    let head: Vec<usize> = (0..table.len().min(preview_rows)).collect();
    Summary {
        rows: table.len(),
        columns: table.column_count(),
        preview: table.select_rows(&head),
    }
}

/// `column` against Timestamp, sorted by time.
///
/// The sort is stable, so equal timestamps keep row order. Rows missing
/// either value are skipped.
pub fn time_series(table: &MeasurementTable, column: &str) -> Vec<SeriesPoint> {
    let (Some(ts_col), Some(val_col)) =
        (table.column_index(TIMESTAMP_COLUMN), table.column_index(column))
    else {
        return Vec::new();
    };
    let mut points: Vec<SeriesPoint> = table
        .rows
        .iter()
        .filter_map(|row| {
            Some(SeriesPoint {
                timestamp: row[ts_col].as_timestamp()?,
                value: row[val_col].as_f64()?,
            })
        })
        .collect();
    points.sort_by_key(|p| p.timestamp);
    points
}

/// Re-derive every view from scratch.
pub fn derive_view(
    table: &MeasurementTable,
    controls: &DashboardControls,
    config: &DashboardConfig,
) -> DashboardView {
    let range = controls.range.map(|r| r.range());
    let filtered = match range {
        Some(r) => filter_by_range(table, r.low, r.high),
        None => table.select_rows(&[]),
    };

    let ghi_series = controls
        .show_time_series
        .then(|| time_series(&filtered, GHI_COLUMN));
    let dni_series = (controls.show_time_series && controls.overlay_dni && table.is_numeric(DNI_COLUMN))
        .then(|| time_series(&filtered, DNI_COLUMN));

    let correlation = controls
        .correlation_column
        .as_ref()
        .map(|col| (col.clone(), compute_correlation(table, col)));

    log::debug!(
        "derived view: {} of {} rows in range {:?}",
        filtered.len(),
        table.len(),
        range
    );

    DashboardView {
        summary: summarize(table, config.preview_rows),
        range,
        filtered,
        ghi_series,
        dni_series,
        correlation,
        correlation_overview: correlation_table(table),
        deploy_message: controls.deployed.then_some(DEPLOY_MESSAGE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::coerce::MissingPolicy;
    use crate::data::loader::{parse_csv, LoadOptions};

    const CSV: &str = "Timestamp,GHI,DNI,Comments\n\
                       2021-08-09 00:03,300,200,c\n\
                       2021-08-09 00:01,100,50,a\n\
                       bad,bad,1,b\n\
                       2021-08-09 00:01,150,60,d\n\
                       2021-08-09 00:02,500,,e\n";

    fn table(policy: MissingPolicy) -> MeasurementTable {
        let options = LoadOptions {
            missing_policy: policy,
            ..LoadOptions::default()
        };
        let raw = parse_csv(CSV, &options).unwrap();
        policy.apply(raw).0
    }

    fn values(points: &[SeriesPoint]) -> Vec<f64> {
        points.iter().map(|p| p.value).collect()
    }

    #[test]
    fn initial_controls_cover_full_range() {
        let t = table(MissingPolicy::Drop);
        let controls = DashboardControls::initial(&t, &DashboardConfig::default());
        assert_eq!(controls.range.unwrap().range(), GhiRange::new(100.0, 500.0));
        assert_eq!(controls.correlation_column.as_deref(), Some("Timestamp"));
        assert!(controls.show_time_series);
    }

    #[test]
    fn series_is_time_ordered_with_stable_ties() {
        let t = table(MissingPolicy::Drop);
        assert_eq!(values(&time_series(&t, GHI_COLUMN)), [100.0, 150.0, 500.0, 300.0]);
        assert_eq!(values(&time_series(&t, DNI_COLUMN)), [50.0, 60.0, 200.0]);
    }

    #[test]
    fn series_skips_retained_missing_rows() {
        let t = table(MissingPolicy::Retain);
        assert_eq!(t.len(), 5);
        assert_eq!(time_series(&t, GHI_COLUMN).len(), 4);
    }

    #[test]
    fn view_follows_controls() {
        let t = table(MissingPolicy::Drop);
        let config = DashboardConfig::default();
        let mut controls = DashboardControls::initial(&t, &config);

        let view = derive_view(&t, &controls, &config);
        assert_eq!(view.filtered, t);
        assert_eq!(view.summary.rows, 4);
        assert_eq!(view.summary.columns, 4);
        assert_eq!(view.summary.preview.len(), 4);
        assert!(view.ghi_series.is_some());
        assert!(view.dni_series.is_none());
        assert!(matches!(
            view.correlation,
            Some((_, Correlation::NotApplicable { .. }))
        ));
        assert_eq!(view.deploy_message, None);

        if let Some(range) = controls.range.as_mut() {
            range.set_high(300.0);
        }
        controls.show_time_series = false;
        controls.correlation_column = Some("GHI".into());
        controls.deployed = true;

        let view = derive_view(&t, &controls, &config);
        assert_eq!(view.filtered, filter_by_range(&t, 100.0, 300.0));
        assert_eq!(view.filtered, t.select_rows(&[0, 1, 2]));
        assert_eq!(view.ghi_series, None);
        let r = view.correlation.unwrap().1.coefficient().unwrap();
        assert!((r - 1.0).abs() < 1e-12);
        assert_eq!(view.deploy_message, Some(DEPLOY_MESSAGE));
    }

    #[test]
    fn dni_overlay_needs_time_series_toggle() {
        let t = table(MissingPolicy::Drop);
        let config = DashboardConfig::default();
        let mut controls = DashboardControls::initial(&t, &config);
        controls.overlay_dni = true;
        assert_eq!(derive_view(&t, &controls, &config).dni_series.map(|s| s.len()), Some(3));
        controls.show_time_series = false;
        assert_eq!(derive_view(&t, &controls, &config).dni_series, None);
    }

    #[test]
    fn preview_is_capped() {
        let t = table(MissingPolicy::Retain);
        let summary = summarize(&t, 2);
        assert_eq!((summary.rows, summary.preview.len()), (5, 2));
    }

    #[test]
    fn table_without_ghi_values_filters_nothing() {
        let t = parse_csv(
            "Timestamp,GHI\n2021-01-01,x\n",
            &LoadOptions {
                missing_policy: MissingPolicy::Retain,
                ..LoadOptions::default()
            },
        )
        .unwrap();
        let config = DashboardConfig::default();
        let view = derive_view(&t, &DashboardControls::initial(&t, &config), &config);
        assert_eq!(view.range, None);
        assert!(view.filtered.is_empty());
    }
}
