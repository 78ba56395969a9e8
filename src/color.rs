use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

use crate::data::model::Season;

// ---------------------------------------------------------------------------
// Categorical palette
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Fixed colour per season so bars keep their colour when filters change.
pub fn season_color(season: Season) -> Color32 {
    match season {
        Season::Winter => Color32::from_rgb(0xE0, 0xE8, 0xF0),
        Season::Spring => Color32::from_rgb(0x77, 0xDD, 0x77),
        Season::Summer => Color32::from_rgb(0xFF, 0x63, 0x47),
        Season::Fall => Color32::from_rgb(0xFF, 0x8C, 0x00),
        Season::Unknown => Color32::GRAY,
    }
}

// ---------------------------------------------------------------------------
// Continuous scale: tomato → pastel green
// ---------------------------------------------------------------------------

/// Two-stop colour scale for intensity-coloured bars and points.
#[derive(Debug, Clone, Copy)]
pub struct Gradient {
    low: LinSrgb,
    high: LinSrgb,
}

impl Default for Gradient {
    fn default() -> Self {
        Gradient {
            low: Srgb::<u8>::new(0xFF, 0x63, 0x47).into_format::<f32>().into_linear(),
            high: Srgb::<u8>::new(0x77, 0xDD, 0x77).into_format::<f32>().into_linear(),
        }
    }
}

impl Gradient {
    /// Colour at `t` in `[0, 1]`; values outside are clamped.
    pub fn at(&self, t: f64) -> Color32 {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mixed = self.low.mix(self.high, t as f32);
        to_color32(Srgb::from_linear(mixed))
    }

    /// Colour for `value` scaled between `min` and `max`.  A flat range
    /// maps everything to the low end.
    pub fn scaled(&self, value: f64, min: f64, max: f64) -> Color32 {
        let range = max - min;
        if range.abs() < f64::EPSILON {
            self.at(0.0)
        } else {
            self.at((value - min) / range)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(2).len(), 2);
    }

    #[test]
    fn gradient_endpoints() {
        let g = Gradient::default();
        assert_eq!(g.at(0.0), Color32::from_rgb(0xFF, 0x63, 0x47));
        assert_eq!(g.at(1.0), Color32::from_rgb(0x77, 0xDD, 0x77));
        assert_eq!(g.scaled(5.0, 5.0, 5.0), g.at(0.0));
        assert_eq!(g.at(f64::NAN), g.at(0.0));
    }
}
