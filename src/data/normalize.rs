use serde::{Deserialize, Serialize};

use super::filter::{windowed_intensities, Window};
use super::model::SpectralSample;
use crate::error::NormalizeError;

/// How an intensity becomes an alpha value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// `intensity / bottom / top * 255`: robust against single spikes.
    #[default]
    PercentileRatio,
    /// `intensity / top * 255`.
    Peak,
}

/// Reference statistics computed over the windowed intensities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityScale {
    pub bottom: f64,
    pub top: f64,
    pub mode: Normalization,
}

impl IntensityScale {
    /// Compute `bottom` and `top` as percentiles (0..=100, linear
    /// interpolation between order statistics) of the intensities inside
    /// `window`. A `top` of 100 is the maximum.
    pub fn from_samples(
        samples: &[SpectralSample],
        window: &Window,
        percentile_bottom: f64,
        percentile_top: f64,
        mode: Normalization,
    ) -> Result<Self, NormalizeError> {
        for p in [percentile_bottom, percentile_top] {
            if !(0.0..=100.0).contains(&p) {
                return Err(NormalizeError::InvalidPercentile(p));
            }
        }
        if percentile_bottom > percentile_top {
            return Err(NormalizeError::InvertedPercentiles {
                bottom: percentile_bottom,
                top: percentile_top,
            });
        }

        let mut values = windowed_intensities(samples, window);
        if values.is_empty() {
            return Err(NormalizeError::EmptyWindow {
                min_nm: window.min_nm,
                max_nm: window.max_nm,
            });
        }
        values.sort_by(f64::total_cmp);

        let bottom = percentile(&values, percentile_bottom);
        let top = percentile(&values, percentile_top);
        log::debug!(
            "intensity scale over {} samples: p{percentile_bottom}={bottom}, p{percentile_top}={top}",
            values.len()
        );
        Self::new(bottom, top, mode)
    }

    /// Build a scale from known reference values, rejecting divisors that
    /// would produce infinite or `NaN` alphas.
    pub fn new(bottom: f64, top: f64, mode: Normalization) -> Result<Self, NormalizeError> {
        check_divisor("top", top)?;
        if mode == Normalization::PercentileRatio {
            check_divisor("bottom", bottom)?;
        }
        Ok(Self { bottom, top, mode })
    }

    pub fn alpha(&self, intensity: f64) -> u8 {
        let ratio = match self.mode {
            Normalization::PercentileRatio => intensity / self.bottom / self.top,
            Normalization::Peak => intensity / self.top,
        };
        clamp_to_byte(ratio * 255.0)
    }
}

fn check_divisor(which: &'static str, value: f64) -> Result<(), NormalizeError> {
    if value == 0.0 || !value.is_finite() {
        Err(NormalizeError::ZeroDivisor { which, value })
    } else {
        Ok(())
    }
}

/// Percentile of an ascending, non-empty slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Clamp to 0..=255 and truncate.
fn clamp_to_byte(v: f64) -> u8 {
    if v.is_nan() {
        0
    } else {
        v.clamp(0.0, 255.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tens() -> Vec<SpectralSample> {
        (1..=10)
            .map(|i| SpectralSample::new(400.0 + f64::from(i), f64::from(i * 10)))
            .collect()
    }

    #[test]
    fn percentiles_interpolate_linearly() {
        let v = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(percentile(&v, 0.0), 10.0);
        assert_eq!(percentile(&v, 100.0), 50.0);
        assert_eq!(percentile(&v, 50.0), 30.0);
        assert_eq!(percentile(&v, 12.5), 15.0);
    }

    #[test]
    fn alpha_strictly_increases_with_intensity() {
        let samples = tens();
        for (pb, pt) in [(0.0, 100.0), (10.0, 90.0), (20.0, 80.0)] {
            let scale = IntensityScale::from_samples(
                &samples,
                &Window::UNBOUNDED,
                pb,
                pt,
                Normalization::PercentileRatio,
            )
            .unwrap();
            let alphas: Vec<u8> = samples.iter().map(|s| scale.alpha(s.intensity)).collect();
            assert!(alphas.windows(2).all(|w| w[0] < w[1]), "{pb}/{pt}: {alphas:?}");
        }
    }

    #[test]
    fn changing_percentiles_changes_alphas() {
        let samples = tens();
        let alphas = |pb: f64, pt: f64| -> Vec<u8> {
            let scale = IntensityScale::from_samples(
                &samples,
                &Window::UNBOUNDED,
                pb,
                pt,
                Normalization::Peak,
            )
            .unwrap();
            samples.iter().map(|s| scale.alpha(s.intensity)).collect()
        };
        let wide = alphas(0.0, 100.0);
        let narrow = alphas(0.0, 50.0);
        assert_ne!(wide, narrow);
        assert_eq!(wide.last(), Some(&255));
        assert!(wide.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn peak_mode_matches_max_scaling() {
        let scale = IntensityScale::new(0.0, 100.0, Normalization::Peak).unwrap();
        assert_eq!(scale.alpha(50.0), 127);
        assert_eq!(scale.alpha(100.0), 255);
        assert_eq!(scale.alpha(400.0), 255);
        assert_eq!(scale.alpha(-3.0), 0);
    }

    #[test]
    fn empty_window_is_an_error() {
        let err = IntensityScale::from_samples(
            &tens(),
            &Window::new(Some(900.0), Some(950.0)),
            5.0,
            95.0,
            Normalization::PercentileRatio,
        )
        .unwrap_err();
        assert!(matches!(err, NormalizeError::EmptyWindow { .. }));
    }

    #[test]
    fn zero_bottom_is_an_error() {
        let mut samples = tens();
        samples[0].intensity = 0.0;
        let err = IntensityScale::from_samples(
            &samples,
            &Window::UNBOUNDED,
            0.0,
            100.0,
            Normalization::PercentileRatio,
        )
        .unwrap_err();
        assert_eq!(
            err,
            NormalizeError::ZeroDivisor {
                which: "bottom",
                value: 0.0
            }
        );
    }

    #[test]
    fn bad_percentiles_are_rejected() {
        let samples = tens();
        let run = |pb, pt| {
            IntensityScale::from_samples(&samples, &Window::UNBOUNDED, pb, pt, Normalization::Peak)
        };
        assert_eq!(run(-1.0, 50.0), Err(NormalizeError::InvalidPercentile(-1.0)));
        assert_eq!(run(0.0, 101.0), Err(NormalizeError::InvalidPercentile(101.0)));
        assert!(matches!(run(60.0, 40.0), Err(NormalizeError::InvertedPercentiles { .. })));
    }
}
