use std::path::PathBuf;

use crate::config::DashboardConfig;
use crate::dashboard::{derive_view, DashboardControls, DashboardView};
use crate::data::loader::load_data;
use crate::data::model::MeasurementTable;
use crate::data::source::DataSource;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded table (None until a load succeeds).
    pub table: Option<MeasurementTable>,

    /// Current control values; reset on every load.
    pub controls: Option<DashboardControls>,

    /// Views derived from `table` and `controls`.
    pub view: Option<DashboardView>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            table: None,
            controls: None,
            view: None,
            status_message: None,
        }
    }

    /// (Re)load the configured source. On failure the previous table stays.
    pub fn reload(&mut self) {
        let source = self.config.source.clone();
        match load_data(&source, &self.config.load_options()) {
            Ok(table) => self.set_table(table),
            Err(e) => {
                log::error!("Failed to load {source}: {e}");
                self.status_message = Some(format!("Error loading {source}: {e}"));
            }
        }
    }

    /// Switch to a local file picked in the UI and load it.
    pub fn open_path(&mut self, path: PathBuf) {
        self.config.source = DataSource::File(path);
        self.reload();
    }

    /// Ingest a newly loaded table and reset the controls.
    pub fn set_table(&mut self, table: MeasurementTable) {
        self.controls = Some(DashboardControls::initial(&table, &self.config));
        self.table = Some(table);
        self.status_message = None;
        self.refresh();
    }

    /// Recompute every view after a control change.
    pub fn refresh(&mut self) {
        self.view = match (&self.table, &self.controls) {
            (Some(table), Some(controls)) => Some(derive_view(table, controls, &self.config)),
            _ => None,
        };
    }

    /// Apply `change` to the controls and re-derive the views.
    pub fn update_controls(&mut self, change: impl FnOnce(&mut DashboardControls)) {
        if let Some(controls) = self.controls.as_mut() {
            change(controls);
            self.refresh();
        }
    }
}
