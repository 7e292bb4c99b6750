//! Velocity heat scale: red when slow, green when fast.

use serde::{Deserialize, Serialize};

/// Hue span of the scale, in degrees (0 = red, 120 = green).
pub const VELOCITY_HUE_SPAN: f64 = 120.0;

/// An HSL color. Saturation and lightness are fractions in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HslColor {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl HslColor {
    pub fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// 8-bit sRGB channels.
    pub fn to_rgb(&self) -> [u8; 3] {
        let h = self.hue.rem_euclid(360.0) / 60.0;
        let s = self.saturation.clamp(0.0, 1.0);
        let l = self.lightness.clamp(0.0, 1.0);

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = l - c / 2.0;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        let to_byte = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        [to_byte(r), to_byte(g), to_byte(b)]
    }

    /// CSS form, e.g. `hsl(60.0, 70%, 50%)`.
    pub fn css(&self) -> String {
        format!(
            "hsl({:.1}, {:.0}%, {:.0}%)",
            self.hue,
            self.saturation * 100.0,
            self.lightness * 100.0
        )
    }
}

/// Map a velocity onto the heat scale.
///
/// `velocity * gain` is clamped to [0, 1] and spread linearly over hues
/// 0..=120 at 70% saturation and 50% lightness.
pub fn velocity_color(velocity: f64, gain: f64) -> HslColor {
    let v = (velocity * gain).clamp(0.0, 1.0);
    let v = if v.is_nan() { 0.0 } else { v };
    HslColor::new(v * VELOCITY_HUE_SPAN, 0.7, 0.5)
}
