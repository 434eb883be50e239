use chrono::DateTime;
use eframe::egui::{RichText, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::color::generate_palette;
use crate::dashboard::SeriesPoint;

// ---------------------------------------------------------------------------
// Time-series plot (central panel)
// ---------------------------------------------------------------------------

/// Render GHI (and optionally DNI) against Timestamp.
///
/// X values are seconds since the Unix epoch; tick labels put the date and
/// the time on separate lines since egui_plot cannot rotate them.
pub fn time_series_plot(ui: &mut Ui, ghi: &[SeriesPoint], dni: Option<&[SeriesPoint]>) {
    ui.label(RichText::new("GHI Over Time (Filtered by Range)").strong().size(18.0));

    if ghi.is_empty() {
        ui.label("No rows in the selected range.");
        return;
    }

    let colours = generate_palette(2);

    Plot::new("time_series_plot")
        .height(320.0)
        .legend(Legend::default())
        .x_axis_label("Timestamp")
        .y_axis_label("W/m²")
        .x_axis_formatter(|mark, _range| format_tick(mark.value))
        .label_formatter(|name, value| {
            let time = format_tick(value.x).replace('\n', " ");
            if name.is_empty() {
                format!("{time}\n{:.1}", value.y)
            } else {
                format!("{name}\n{time}\n{:.1}", value.y)
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(to_points(ghi))
                    .name("GHI")
                    .color(colours[0])
                    .width(1.5),
            );
            if let Some(dni) = dni {
                plot_ui.line(
                    Line::new(to_points(dni))
                        .name("DNI")
                        .color(colours[1])
                        .width(1.5),
                );
            }
        });
}

fn to_points(series: &[SeriesPoint]) -> PlotPoints<'_> {
    series
        .iter()
        .map(|p| [p.timestamp.and_utc().timestamp() as f64, p.value])
        .collect()
}

fn format_tick(seconds: f64) -> String {
    DateTime::from_timestamp(seconds.round() as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d\n%H:%M").to_string())
        .unwrap_or_default()
}
