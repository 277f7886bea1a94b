use eframe::egui::Color32;
use palette::{LinSrgb, Srgb};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Wavelength → colour model
// ---------------------------------------------------------------------------

/// Shortest wavelength the model assigns any colour to.
pub const MODEL_START_NM: f64 = 350.0;
/// First wavelength past the modeled range.
pub const MODEL_END_NM: f64 = 1000.0;

/// Piecewise-linear visible spectrum, optionally dimmed towards the edges of
/// human visual sensitivity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorModel {
    /// Dim violet/UV below 420 nm and red/IR above 700 nm.
    pub falloff: bool,
    /// Global channel scale, 1.0 = full saturation.
    pub brightness: f64,
}

impl Default for ColorModel {
    fn default() -> Self {
        Self {
            falloff: true,
            brightness: 1.0,
        }
    }
}

impl ColorModel {
    /// Colour of a wavelength. The wavelength is truncated to whole nm and
    /// channels are truncated after sRGB encoding. Outside the modeled range
    /// the result is black.
    pub fn wavelength_to_rgb(&self, wavelength_nm: f64) -> Srgb<u8> {
        let lin = self.linear_rgb(wavelength_nm.trunc());
        let encoded = Srgb::from_linear(lin);
        Srgb::new(
            to_channel(encoded.red),
            to_channel(encoded.green),
            to_channel(encoded.blue),
        )
    }

    /// Colour used for a table sample: like [`Self::wavelength_to_rgb`], but
    /// wavelengths without a colour are drawn flat white instead of black.
    pub fn sample_color(&self, wavelength_nm: f64) -> Srgb<u8> {
        let rgb = self.wavelength_to_rgb(wavelength_nm);
        if rgb == Srgb::new(0, 0, 0) {
            Srgb::new(255, 255, 255)
        } else {
            rgb
        }
    }

    /// Linear-light channels before encoding, continuous in `wavelength_nm`.
    pub fn linear_rgb(&self, wavelength_nm: f64) -> LinSrgb<f32> {
        let (r, g, b) = hue(wavelength_nm);
        let factor = self.intensity_factor(wavelength_nm) * self.brightness;
        let scale = |c: f64| (c * factor).clamp(0.0, 1.0) as f32;
        LinSrgb::new(scale(r), scale(g), scale(b))
    }

    fn intensity_factor(&self, w: f64) -> f64 {
        if !(MODEL_START_NM..MODEL_END_NM).contains(&w) {
            0.0
        } else if self.falloff {
            sensitivity(w)
        } else {
            1.0
        }
    }
}

/// Hue ramps. Each band holds one channel at full value and ramps another, so
/// neighbouring bands agree at their shared threshold.
fn hue(w: f64) -> (f64, f64, f64) {
    if w < 440.0 {
        (((440.0 - w) / 90.0).min(1.0), 0.0, 1.0)
    } else if w < 490.0 {
        (0.0, (w - 440.0) / 50.0, 1.0)
    } else if w < 510.0 {
        (0.0, 1.0, (510.0 - w) / 20.0)
    } else if w < 580.0 {
        ((w - 510.0) / 70.0, 1.0, 0.0)
    } else if w < 645.0 {
        (1.0, (645.0 - w) / 65.0, 0.0)
    } else {
        (1.0, 0.0, 0.0)
    }
}

/// Relative visual sensitivity: full between 420 and 700 nm, ramping through
/// 0.6 at 380 nm and 0.3 at 780 nm down to zero at the model edges.
fn sensitivity(w: f64) -> f64 {
    if w < MODEL_START_NM {
        0.0
    } else if w < 380.0 {
        0.6 * (w - MODEL_START_NM) / 30.0
    } else if w < 420.0 {
        0.3 + 0.7 * (w - MODEL_START_NM) / 70.0
    } else if w <= 700.0 {
        1.0
    } else if w < 780.0 {
        1.0 - 0.7 * (w - 700.0) / 80.0
    } else if w < MODEL_END_NM {
        0.3 * (MODEL_END_NM - w) / 220.0
    } else {
        0.0
    }
}

/// Truncate an encoded channel to a byte. f32 sRGB encoding of a full
/// channel lands a few ulps under 1.0, which must still come out as 255.
fn to_channel(v: f32) -> u8 {
    let scaled = f64::from(v.clamp(0.0, 1.0)) * 255.0;
    (scaled + 1e-4).min(255.0) as u8
}

/// Display colour for the viewer, with `alpha` as opacity.
pub fn to_color32(rgb: Srgb<u8>, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(rgb.red, rgb.green, rgb.blue, alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLDS: [f64; 11] = [
        350.0, 380.0, 420.0, 440.0, 490.0, 510.0, 580.0, 645.0, 700.0, 780.0, 1000.0,
    ];

    fn channels(c: LinSrgb<f32>) -> [f32; 3] {
        [c.red, c.green, c.blue]
    }

    #[test]
    fn continuous_at_every_threshold() {
        for model in [ColorModel::default(), ColorModel { falloff: false, ..Default::default() }] {
            for t in THRESHOLDS {
                // Model edges are a hard cut when falloff is off.
                if !model.falloff && (t == MODEL_START_NM || t == MODEL_END_NM) {
                    continue;
                }
                let left = channels(model.linear_rgb(t - 1e-7));
                let right = channels(model.linear_rgb(t));
                for (l, r) in left.iter().zip(right) {
                    assert!((l - r).abs() < 1e-4, "jump at {t} nm: {left:?} vs {right:?}");
                }
            }
        }
    }

    #[test]
    fn whole_nm_steps_never_jump() {
        // The steepest ramp (490-510 nm) moves 255/20 units per nm.
        let model = ColorModel::default();
        for w in 300..1100 {
            let a = channels(model.linear_rgb(f64::from(w)));
            let b = channels(model.linear_rgb(f64::from(w + 1)));
            for (x, y) in a.iter().zip(b) {
                assert!((x - y).abs() * 255.0 <= 13.0, "step at {w} nm");
            }
        }
    }

    #[test]
    fn no_data_wavelengths_become_white() {
        let model = ColorModel::default();
        assert_eq!(model.wavelength_to_rgb(200.0), Srgb::new(0, 0, 0));
        assert_eq!(model.sample_color(200.0), Srgb::new(255, 255, 255));
        assert_eq!(model.sample_color(1500.0), Srgb::new(255, 255, 255));
    }

    #[test]
    fn green_is_yellowish_green() {
        let c = ColorModel::default().sample_color(550.0);
        assert!((180..=255).contains(&c.red), "{c:?}");
        assert_eq!(c.green, 255);
        assert_eq!(c.blue, 0);
    }

    #[test]
    fn saturated_channels_reach_full_value() {
        let model = ColorModel::default();
        assert_eq!(model.wavelength_to_rgb(650.0), Srgb::new(255, 0, 0));
        assert_eq!(model.wavelength_to_rgb(450.0).blue, 255);
        assert_eq!(to_channel(0.999_999_94), 255);
        assert_eq!(to_channel(0.5), 127);
    }

    #[test]
    fn violet_falloff_ramps_from_sixty_percent() {
        assert!((sensitivity(380.0) - 0.6).abs() < 1e-12);
        assert!((sensitivity(400.0) - 0.8).abs() < 1e-12);
        assert!((sensitivity(410.0) - 0.9).abs() < 1e-12);
        assert!((sensitivity(365.0) - 0.3).abs() < 1e-12);
        // Blue is fully on below 440 nm, so it shows the factor directly.
        let blue = ColorModel::default().linear_rgb(400.0).blue;
        assert!((blue - 0.8).abs() < 1e-6, "{blue}");
    }

    #[test]
    fn wavelength_is_truncated_to_whole_nm() {
        let model = ColorModel::default();
        assert_eq!(model.wavelength_to_rgb(500.9), model.wavelength_to_rgb(500.0));
    }

    #[test]
    fn brightness_scales_channels_down() {
        let dim = ColorModel { brightness: 0.5, ..Default::default() };
        let full = ColorModel::default();
        assert!(dim.wavelength_to_rgb(600.0).red < full.wavelength_to_rgb(600.0).red);
    }
}
