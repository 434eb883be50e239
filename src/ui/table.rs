use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{CellValue, MeasurementTable};

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Measurement table widget
// ---------------------------------------------------------------------------

/// Render `table` as a striped, scrollable grid. The first column is the row number.
pub fn data_table(ui: &mut Ui, id: &str, table: &MeasurementTable, max_height: f32) {
    ui.push_id(id, |ui: &mut Ui| {
        ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .vscroll(true)
                .max_scroll_height(max_height)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::auto())
                .columns(Column::auto().at_least(60.0), table.column_count())
                .header(20.0, |mut header| {
                    header.col(|ui: &mut Ui| {
                        ui.strong("#");
                    });
                    for name in &table.column_names {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, table.len(), |mut row| {
                        let idx = row.index();
                        let Some(cells) = table.rows.get(idx) else {
                            return;
                        };
                        row.col(|ui: &mut Ui| {
                            ui.label(RichText::new(idx.to_string()).weak());
                        });
                        for cell in cells {
                            row.col(|ui: &mut Ui| cell_label(ui, cell));
                        }
                    });
                });
        });
    });
}

fn cell_label(ui: &mut Ui, cell: &CellValue) {
    match cell {
        CellValue::Missing(missing) => {
            let response = ui.label(RichText::new("<missing>").weak().italics());
            if !missing.raw.is_empty() {
                response.on_hover_text(format!("could not parse '{}'", missing.raw));
            }
        }
        other => {
            ui.label(other.to_string());
        }
    }
}
