use anyhow::{Context, Result};

use crate::config::{RenderJob, SpectrumConfig};
use crate::data::loader::load_file;
use crate::data::model::SpectralTable;
use crate::pipeline;
use crate::render::{OutputFiles, Renderer};

/// Render one job from an already loaded table and write its files.
pub fn render_job(
    table: &SpectralTable,
    job: &RenderJob,
    renderer: &Renderer,
    config: &SpectrumConfig,
) -> Result<OutputFiles> {
    let frame = pipeline::run(table, &job.params)
        .with_context(|| format!("computing '{}'", job.name))?;
    let drawing = renderer
        .draw(&frame)
        .with_context(|| format!("drawing '{}'", job.name))?;
    let files = drawing
        .write(&config.output_stem(job))
        .with_context(|| format!("writing '{}'", job.name))?;
    log::info!("Wrote {} and {}", files.svg.display(), files.png.display());
    Ok(files)
}

/// Load the input table once and produce every configured output.
/// Stops at the first failing job.
pub fn generate_all(config: &SpectrumConfig) -> Result<Vec<OutputFiles>> {
    let table = load_file(&config.input)
        .with_context(|| format!("loading {}", config.input.display()))?;
    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating {}", config.output_dir.display()))?;
    let renderer = Renderer::for_config(config)?;

    config
        .jobs
        .iter()
        .map(|job| render_job(&table, job, &renderer, config))
        .collect()
}
