use std::collections::BTreeMap;

use super::filter::Window;
use super::model::{to_centi_nm, ColorSample};
use crate::error::AggregateError;

/// Upper bound on the buckets one walk may produce. A stray row far outside
/// the rest of the table would otherwise allocate a sentinel per step.
pub const MAX_BUCKETS: i64 = 20_000_000;

// ---------------------------------------------------------------------------
// Fixed-step bucketing
// ---------------------------------------------------------------------------

/// A group of samples that rounded to the same bucket.
struct Bucket {
    first: ColorSample,
    alpha_sum: u32,
    count: u32,
}

/// Merge samples into one entry per `step_nm` of wavelength.
///
/// Wavelengths are rounded to the nearest multiple of `step_nm` in
/// hundredths of a nm, so keys never drift. A bucket keeps the colour of the
/// first sample that landed in it and the mean of all their alphas. The
/// result runs from the lowest key up to, but not including, the highest;
/// keys nothing landed in are filled with a black, zero-alpha sentinel.
pub fn aggregate(
    samples: &[ColorSample],
    window: &Window,
    step_nm: f64,
) -> Result<Vec<ColorSample>, AggregateError> {
    let step = to_centi_nm(step_nm);
    // Keys are whole hundredths of a nm, so the step must be one too.
    if !step_nm.is_finite() || step < 1 || (step_nm * 100.0 - step as f64).abs() > 1e-6 {
        return Err(AggregateError::InvalidStep(step_nm));
    }

    let mut buckets: BTreeMap<i64, Bucket> = BTreeMap::new();
    for sample in samples.iter().filter(|s| window.contains(s.wavelength_nm())) {
        let key = bucket_key(sample.centi_nm(), step);
        buckets
            .entry(key)
            .and_modify(|b| {
                b.alpha_sum += u32::from(sample.alpha);
                b.count += 1;
            })
            .or_insert(Bucket {
                first: *sample,
                alpha_sum: u32::from(sample.alpha),
                count: 1,
            });
    }

    let (Some(&lowest), Some(&highest)) = (buckets.keys().next(), buckets.keys().next_back())
    else {
        return Ok(Vec::new());
    };
    let span = i128::from(highest) - i128::from(lowest);
    if span > i128::from(MAX_BUCKETS) {
        return Err(AggregateError::SpanTooLarge {
            lowest_nm: (i128::from(lowest) * i128::from(step)) as f64 / 100.0,
            highest_nm: (i128::from(highest) * i128::from(step)) as f64 / 100.0,
            buckets: span,
        });
    }

    let out: Vec<ColorSample> = (lowest..highest)
        .map(|key| {
            let centi_nm = key * step;
            match buckets.get(&key) {
                Some(b) => ColorSample::from_centi_nm(
                    centi_nm,
                    b.first.color,
                    (b.alpha_sum / b.count) as u8,
                ),
                None => ColorSample::sentinel(centi_nm),
            }
        })
        .collect();

    log::debug!(
        "aggregated {} samples into {} buckets of {step_nm} nm ({} filled)",
        samples.len(),
        out.len(),
        buckets.len()
    );
    Ok(out)
}

/// Nearest multiple of `step`, ties rounding up.
fn bucket_key(centi_nm: i64, step: i64) -> i64 {
    let (c, s) = (i128::from(centi_nm), i128::from(step));
    // |key| <= |centi_nm| for step >= 1, so the narrowing cannot truncate.
    ((2 * c + s).div_euclid(2 * s)) as i64
}

#[cfg(test)]
mod tests {
    use palette::Srgb;

    use super::*;

    fn sample(nm: f64, alpha: u8) -> ColorSample {
        ColorSample::new(nm, Srgb::new(10, 20, 30), alpha)
    }

    #[test]
    fn keys_round_to_nearest_step() {
        assert_eq!(bucket_key(50024, 50), 1000);
        assert_eq!(bucket_key(50025, 50), 1001);
        assert_eq!(bucket_key(-30, 50), -1);
        // 0.1 nm steps stay exact where float division would drift.
        assert_eq!(bucket_key(to_centi_nm(0.3), to_centi_nm(0.1)), 3);
    }

    #[test]
    fn groups_take_first_color_and_mean_alpha() {
        let mut second = sample(500.2, 100);
        second.color = Srgb::new(1, 2, 3);
        let out = aggregate(
            &[sample(499.9, 10), second, sample(500.4, 41), sample(501.0, 7)],
            &Window::UNBOUNDED,
            1.0,
        )
        .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].color, Srgb::new(10, 20, 30));
        assert_eq!(out[0].alpha, 50);
        assert_eq!(out[0].wavelength_nm(), 500.0);
    }

    #[test]
    fn gaps_are_filled_with_sentinels() {
        let out = aggregate(
            &[sample(400.0, 9), sample(403.0, 9), sample(405.0, 9)],
            &Window::UNBOUNDED,
            1.0,
        )
        .unwrap();
        let wavelengths: Vec<f64> = out.iter().map(ColorSample::wavelength_nm).collect();
        assert_eq!(wavelengths, vec![400.0, 401.0, 402.0, 403.0, 404.0]);
        let sentinels: Vec<bool> = out.iter().map(ColorSample::is_sentinel).collect();
        assert_eq!(sentinels, vec![false, true, true, false, true]);
    }

    #[test]
    fn already_bucketed_input_is_reproduced() {
        let input: Vec<ColorSample> = (0..20)
            .map(|i| sample(300.0 + f64::from(i) * 0.5, i as u8 * 3))
            .collect();
        let out = aggregate(&input, &Window::UNBOUNDED, 0.5).unwrap();
        // The walk stops before the highest bucket.
        assert_eq!(out, input[..input.len() - 1]);
        let again = aggregate(&out, &Window::UNBOUNDED, 0.5).unwrap();
        assert_eq!(again, out[..out.len() - 1]);
    }

    #[test]
    fn window_limits_the_buckets() {
        let input: Vec<ColorSample> = (0..100).map(|i| sample(f64::from(i), 1)).collect();
        let out = aggregate(&input, &Window::new(Some(10.0), Some(20.0)), 2.0).unwrap();
        assert_eq!(out.first().map(ColorSample::wavelength_nm), Some(10.0));
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn empty_input_and_bad_steps() {
        assert!(aggregate(&[], &Window::UNBOUNDED, 1.0).unwrap().is_empty());
        for step in [0.0, -1.0, 0.001, 0.005, 0.015, 1.234, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(
                    aggregate(&[sample(1.0, 1)], &Window::UNBOUNDED, step),
                    Err(AggregateError::InvalidStep(_))
                ),
                "step {step}"
            );
        }
        assert!(aggregate(&[sample(1.0, 1)], &Window::UNBOUNDED, 0.07).is_ok());
    }

    #[test]
    fn outlier_wavelength_is_refused_not_allocated() {
        let input = [sample(500.0, 9), sample(1.0e12, 9)];
        let err = aggregate(&input, &Window::UNBOUNDED, 1.0).unwrap_err();
        assert!(matches!(err, AggregateError::SpanTooLarge { .. }), "{err:?}");

        // Saturated keys must not overflow either.
        let huge = [sample(1.0, 9), sample(1.0e300, 9)];
        assert!(aggregate(&huge, &Window::UNBOUNDED, 0.01).is_err());
        assert_eq!(bucket_key(i64::MAX, 1), i64::MAX);
    }
}
