use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Colour scales
// ---------------------------------------------------------------------------

/// Blue → light grey → red, for correlation coefficients in `[-1, 1]`.
const COOLWARM: [(f32, f32, f32); 3] = [(0.230, 0.299, 0.754), (0.865, 0.865, 0.865), (0.706, 0.016, 0.150)];

/// Pale orange → dark red, for claim counts on the map.
const ORANGE_RED: [(f32, f32, f32); 4] = [
    (0.996, 0.910, 0.784),
    (0.992, 0.733, 0.518),
    (0.937, 0.396, 0.282),
    (0.498, 0.0, 0.0),
];

/// Interpolate evenly spaced colour stops in linear RGB; `t` in `[0, 1]`.
fn sample(stops: &[(f32, f32, f32)], t: f32) -> Color32 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let segments = (stops.len() - 1) as f32;
    let pos = t * segments;
    let i = (pos.floor() as usize).min(stops.len() - 2);
    let local = pos - i as f32;

    let to_linear = |(r, g, b): (f32, f32, f32)| -> LinSrgb { Srgb::new(r, g, b).into_linear() };
    let mixed = to_linear(stops[i]).mix(to_linear(stops[i + 1]), local);
    let rgb: Srgb<u8> = Srgb::<f32>::from_linear(mixed).into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Colour for a correlation coefficient.
pub fn coolwarm(r: f64) -> Color32 {
    sample(&COOLWARM, ((r + 1.0) / 2.0) as f32)
}

/// Colour for `value` on a sequential scale spanning `[lo, hi]`.
pub fn orange_red(value: f64, lo: f64, hi: f64) -> Color32 {
    let t = if hi > lo { (value - lo) / (hi - lo) } else { 1.0 };
    sample(&ORANGE_RED, t as f32)
}

/// Black or white, whichever reads better on `background`.
pub fn contrasting_text(background: Color32) -> Color32 {
    let luma = 0.299 * background.r() as f32 + 0.587 * background.g() as f32 + 0.114 * background.b() as f32;
    if luma > 140.0 { Color32::BLACK } else { Color32::WHITE }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_endpoints_match_stops() {
        assert_eq!(coolwarm(-1.0), Color32::from_rgb(59, 76, 192));
        assert_eq!(orange_red(10.0, 0.0, 10.0), Color32::from_rgb(127, 0, 0));
    }

    #[test]
    fn out_of_range_values_clamp() {
        assert_eq!(coolwarm(5.0), coolwarm(1.0));
        assert_eq!(orange_red(-3.0, 0.0, 10.0), orange_red(0.0, 0.0, 10.0));
    }
}
