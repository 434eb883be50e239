use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::correlation_color;
use crate::dashboard::TITLE;
use crate::data::filter::GhiRange;
use crate::state::AppState;
use crate::ui::{plot, table};

// ---------------------------------------------------------------------------
// Left side panel – interactive controls
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Interactive Controls");
    ui.separator();

    let Some(current) = state.controls.clone() else {
        ui.label("No dataset loaded.");
        return;
    };
    // Widgets edit a copy; the views are re-derived only if something changed.
    let mut next = current.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Select a Range for GHI");
            match next.range.as_mut() {
                Some(filter) => {
                    let GhiRange { mut low, mut high } = filter.range();
                    let bounds = filter.min..=filter.max;
                    if ui
                        .add(egui::Slider::new(&mut low, bounds.clone()).text("low"))
                        .changed()
                    {
                        filter.set_low(low);
                    }
                    if ui
                        .add(egui::Slider::new(&mut high, bounds).text("high"))
                        .changed()
                    {
                        filter.set_high(high);
                    }
                    if ui.small_button("Full range").clicked() {
                        filter.reset();
                    }
                }
                None => {
                    ui.label("GHI has no numeric values.");
                }
            }
            ui.separator();

            ui.checkbox(&mut next.show_time_series, "Show time series");
            let can_overlay = next.show_time_series;
            ui.add_enabled(
                can_overlay,
                egui::Checkbox::new(&mut next.overlay_dni, "Overlay DNI"),
            );
            ui.separator();

            if state.config.show_deploy_button {
                if ui.button("Deploy").clicked() {
                    next.deployed = true;
                }
                if let Some(msg) = state.view.as_ref().and_then(|v| v.deploy_message) {
                    ui.label(RichText::new(msg).color(Color32::LIGHT_GREEN));
                }
                ui.separator();
            }

            if let Some(view) = &state.view {
                ui.strong("Correlation with GHI");
                egui::Grid::new("correlation_overview")
                    .striped(true)
                    .show(ui, |ui: &mut Ui| {
                        for (column, corr) in &view.correlation_overview {
                            ui.label(column);
                            ui.label(
                                RichText::new(corr.to_string()).color(correlation_color(corr)),
                            );
                            ui.end_row();
                        }
                    });
            }
        });

    if next != current {
        log::debug!("controls changed: {next:?}");
        state.update_controls(|controls| *controls = next);
    }
}

// ---------------------------------------------------------------------------
// Central panel – overview, filtered table, plot, correlation
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading(TITLE);

    let (Some(data), Some(view)) = (&state.table, &state.view) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("Open a measurement file to begin  (File → Open…)");
        });
        return;
    };

    let mut picked_column: Option<String> = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.label(RichText::new("Data Overview").strong().size(18.0));
            ui.label(format!(
                "{} rows × {} columns",
                view.summary.rows, view.summary.columns
            ));
            table::data_table(ui, "preview", &view.summary.preview, 160.0);
            ui.add_space(12.0);

            match view.range {
                Some(r) => ui.label(
                    RichText::new(format!(
                        "Filtered Data (GHI between {} and {})",
                        r.low, r.high
                    ))
                    .strong()
                    .size(18.0),
                ),
                None => ui.label(RichText::new("Filtered Data").strong().size(18.0)),
            };
            ui.label(format!("{} rows in range", view.filtered.len()));
            table::data_table(ui, "filtered", &view.filtered, 280.0);
            ui.add_space(12.0);

            if let Some(ghi) = &view.ghi_series {
                plot::time_series_plot(ui, ghi, view.dni_series.as_deref());
                ui.add_space(12.0);
            }

            let selected = view
                .correlation
                .as_ref()
                .map(|(col, _)| col.clone())
                .unwrap_or_default();
            egui::ComboBox::from_label("Select a column for correlation plot")
                .selected_text(&selected)
                .show_ui(ui, |ui: &mut Ui| {
                    for col in &data.column_names {
                        if ui.selectable_label(selected == *col, col).clicked() {
                            picked_column = Some(col.clone());
                        }
                    }
                });
            if let Some((col, corr)) = &view.correlation {
                ui.label(format!("Correlation of {col} with GHI:"));
                ui.label(
                    RichText::new(corr.to_string())
                        .strong()
                        .color(correlation_color(corr)),
                );
            }
        });

    if let Some(col) = picked_column {
        state.update_controls(|controls| controls.correlation_column = Some(col));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(format!("Source: {}", state.config.source));

        if let (Some(data), Some(view)) = (&state.table, &state.view) {
            ui.separator();
            ui.label(format!(
                "{} rows loaded, {} in range",
                data.len(),
                view.filtered.len()
            ));
        }

        if state.config.source.is_remote() && state.config.insecure_tls {
            ui.separator();
            ui.label(RichText::new("TLS verification disabled").color(Color32::YELLOW));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open measurement data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening {}", path.display());
        state.open_path(path);
    }
}
