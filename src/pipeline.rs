use crate::bands::{annotate, Annotation, CATALOG};
use crate::config::PipelineParams;
use crate::data::aggregate::aggregate;
use crate::data::model::{ColorSample, SpectralTable};
use crate::data::normalize::IntensityScale;
use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// table → colour samples → buckets → annotations
// ---------------------------------------------------------------------------

/// Everything a renderer needs for one job.
#[derive(Debug, Clone)]
pub struct SpectrumFrame {
    pub params: PipelineParams,
    pub scale: IntensityScale,
    /// Contiguous fixed-step buckets, ascending wavelength.
    pub buckets: Vec<ColorSample>,
    pub annotations: Vec<Annotation>,
}

impl SpectrumFrame {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Colour and alpha for every row of the table, in table order.
pub fn color_samples(
    table: &SpectralTable,
    params: &PipelineParams,
) -> Result<(Vec<ColorSample>, IntensityScale), PipelineError> {
    let scale = IntensityScale::from_samples(
        table.samples(),
        &params.window(),
        params.percentile_bottom,
        params.percentile_top,
        params.normalization,
    )?;

    let samples = table
        .samples()
        .iter()
        .map(|s| {
            ColorSample::new(
                s.wavelength_nm,
                params.color.sample_color(s.wavelength_nm),
                scale.alpha(s.intensity),
            )
        })
        .collect();
    Ok((samples, scale))
}

/// Run the whole transform for one set of parameters.
pub fn run(table: &SpectralTable, params: &PipelineParams) -> Result<SpectrumFrame, PipelineError> {
    let (samples, scale) = color_samples(table, params)?;
    let buckets = aggregate(&samples, &params.window(), params.step_nm)?;
    let annotations = annotate(&buckets, &CATALOG);
    log::info!(
        "{} rows → {} buckets, {} band annotations",
        table.len(),
        buckets.len(),
        annotations.len()
    );
    Ok(SpectrumFrame {
        params: *params,
        scale,
        buckets,
        annotations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::SpectralSample;
    use crate::data::normalize::Normalization;
    use crate::error::{AggregateError, NormalizeError};

    fn table() -> SpectralTable {
        let samples = (0..=900)
            .map(|i| SpectralSample::new(300.0 + f64::from(i), 1.0 + f64::from(i % 7)))
            .collect();
        SpectralTable::new(samples, "synthetic.tsv")
    }

    #[test]
    fn full_sweep_produces_buckets_and_bands() {
        let frame = run(&table(), &PipelineParams::default()).unwrap();
        assert_eq!(frame.buckets.len(), 900);
        assert_eq!(frame.annotations.len(), 4);
        assert!(frame.buckets.iter().any(|b| b.alpha > 0));
    }

    #[test]
    fn window_restricts_both_statistics_and_buckets() {
        let params = PipelineParams {
            min_nm: Some(500.0),
            max_nm: Some(600.0),
            step_nm: 10.0,
            normalization: Normalization::Peak,
            percentile_top: 100.0,
            ..Default::default()
        };
        let frame = run(&table(), &params).unwrap();
        assert_eq!(frame.scale.top, 7.0);
        assert_eq!(frame.buckets.len(), 10);
        assert_eq!(frame.annotations.len(), 1);
        assert_eq!(frame.annotations[0].label, "Visible");
    }

    #[test]
    fn errors_surface_from_each_stage() {
        let empty_window = PipelineParams {
            min_nm: Some(5000.0),
            ..Default::default()
        };
        assert!(matches!(
            run(&table(), &empty_window),
            Err(PipelineError::Normalize(NormalizeError::EmptyWindow { .. }))
        ));

        let bad_step = PipelineParams {
            step_nm: 0.0,
            ..Default::default()
        };
        assert_eq!(
            run(&table(), &bad_step).unwrap_err(),
            PipelineError::Aggregate(AggregateError::InvalidStep(0.0))
        );
    }
}
