use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Lighting", inline)]
#[serde(default)]
/// Scene lighting: ambient fill, a fixed sun, and an area key light that
/// follows the camera.
pub struct LightingOptions {
    /// Clear color as `#RRGGBB`.
    #[schemars(title = "Background")]
    pub background: String,
    /// Ambient light intensity.
    #[schemars(title = "Ambient", range(min = 0.0, max = 2.0), extend("step" = 0.05))]
    pub ambient: f32,
    /// Sun position; the sun shines from here toward the origin.
    #[schemars(skip)]
    pub sun_position: [f32; 3],
    /// Sun intensity.
    #[schemars(title = "Sun", range(min = 0.0, max = 4.0), extend("step" = 0.05))]
    pub sun_intensity: f32,
    /// Area key light intensity.
    #[schemars(title = "Key Light", range(min = 0.0, max = 12.0), extend("step" = 0.1))]
    pub area_intensity: f32,
    /// Side length of the square area light.
    #[schemars(skip)]
    pub area_size: f32,
    /// Key light offset as a fraction of the camera distance.
    #[schemars(skip)]
    pub area_distance_scale: f32,
    /// Smallest key light offset in world units.
    #[schemars(skip)]
    pub area_min_offset: f32,
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            background: "#090D18".to_owned(),
            ambient: 0.6,
            sun_position: [3.0, 6.0, 5.0],
            sun_intensity: 1.2,
            area_intensity: 6.0,
            area_size: 3.0,
            area_distance_scale: 0.25,
            area_min_offset: 0.5,
        }
    }
}

impl LightingOptions {
    /// Background color as sRGB-encoded `[r, g, b]` in `0..=1`.
    ///
    /// Malformed strings fall back to black.
    #[must_use]
    pub fn background_rgb(&self) -> [f32; 3] {
        parse_hex_color(&self.background).unwrap_or([0.0; 3])
    }

    /// Background color decoded to linear light, for sRGB render targets.
    #[must_use]
    pub fn background_linear(&self) -> [f32; 3] {
        self.background_rgb().map(srgb_to_linear)
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn parse_hex_color(s: &str) -> Option<[f32; 3]> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| {
        u8::from_str_radix(hex.get(i..i + 2)?, 16)
            .ok()
            .map(|v| f32::from(v) / 255.0)
    };
    Some([channel(0)?, channel(2)?, channel(4)?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_background() {
        let rgb = LightingOptions::default().background_rgb();
        assert!((rgb[0] - 9.0 / 255.0).abs() < 1e-6);
        assert!((rgb[1] - 13.0 / 255.0).abs() < 1e-6);
        assert!((rgb[2] - 24.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn linear_background_is_darker_but_keeps_extremes() {
        let opts = LightingOptions {
            background: "#FF0080".to_owned(),
            ..LightingOptions::default()
        };
        let [r, g, b] = opts.background_linear();
        assert!((r - 1.0).abs() < 1e-6);
        assert_eq!(g, 0.0);
        assert!(b < 128.0 / 255.0 && (b - 0.2158).abs() < 1e-3);
    }

    #[test]
    fn malformed_background_is_black() {
        assert_eq!(parse_hex_color("090D18"), None);
        assert_eq!(parse_hex_color("#09"), None);
        assert_eq!(parse_hex_color("#GG0000"), None);
        let opts = LightingOptions {
            background: "nope".to_owned(),
            ..LightingOptions::default()
        };
        assert_eq!(opts.background_rgb(), [0.0; 3]);
    }
}
