use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::stats::Correlation;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
/// Starts at orange so the first series (GHI) reads as sunlight.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (30.0 + (i as f32 / n as f32) * 360.0) % 360.0;
            hsl_to_color32(hue, 0.75, 0.55)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Correlation colour scale
// ---------------------------------------------------------------------------

/// Red for -1, grey for 0, blue for +1; saturation grows with |r|.
pub fn correlation_color(correlation: &Correlation) -> Color32 {
    match correlation.coefficient() {
        Some(r) => {
            let r = r.clamp(-1.0, 1.0) as f32;
            let hue = if r < 0.0 { 0.0 } else { 220.0 };
            hsl_to_color32(hue, 0.15 + 0.7 * r.abs(), 0.55)
        }
        None => Color32::GRAY,
    }
}
