use std::path::Path;

use anyhow::Result;

use crate::config::{OutputMode, PipelineParams, RenderJob, SpectrumConfig};
use crate::data::model::SpectralTable;
use crate::pipeline::{self, SpectrumFrame};
use crate::render::{OutputFiles, Renderer};
use crate::run::render_job;

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// The full viewer state, independent of rendering.
pub struct ViewerState {
    /// Loaded table (None until the user opens a file).
    pub table: Option<SpectralTable>,

    /// Parameters currently being previewed.
    pub params: PipelineParams,

    /// Result of running the pipeline on `table` with `params` (cached).
    pub frame: Option<SpectrumFrame>,

    /// Layout, caption and fonts used when exporting.
    pub config: SpectrumConfig,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl ViewerState {
    pub fn new(config: SpectrumConfig) -> Self {
        let params = config
            .jobs
            .first()
            .map(|job| job.params)
            .unwrap_or_default();
        Self {
            table: None,
            params,
            frame: None,
            config,
            status_message: None,
            loading: false,
        }
    }

    /// Ingest a newly loaded table and compute its preview.
    pub fn set_table(&mut self, table: SpectralTable) {
        self.table = Some(table);
        self.loading = false;
        self.recompute();
    }

    /// Replace the parameters, recomputing only when they changed.
    pub fn set_params(&mut self, params: PipelineParams) {
        if params != self.params {
            self.params = params;
            self.recompute();
        }
    }

    /// Rerun the pipeline after a table or parameter change.
    pub fn recompute(&mut self) {
        let Some(table) = &self.table else {
            self.frame = None;
            return;
        };
        match pipeline::run(table, &self.params) {
            Ok(frame) => {
                self.frame = Some(frame);
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("Preview failed: {e}");
                self.frame = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Output name for the current parameters.
    pub fn job_name(&self) -> String {
        let base = match self.params.output_mode {
            OutputMode::Tiled => "sun-spectrum",
            OutputMode::Fade => "sun-spectrum-fade",
        };
        if self.params.annotate && self.params.output_mode == OutputMode::Tiled {
            format!("{base}-annotated")
        } else {
            base.to_string()
        }
    }

    /// Render the current parameters into `dir`.
    pub fn export(&self, dir: &Path) -> Result<OutputFiles> {
        let Some(table) = &self.table else {
            anyhow::bail!("no table loaded");
        };
        let job = RenderJob::new(&self.job_name(), self.params);
        let config = SpectrumConfig {
            output_dir: dir.to_path_buf(),
            jobs: vec![job.clone()],
            ..self.config.clone()
        };
        let renderer = Renderer::for_config(&config)?;
        render_job(table, &job, &renderer, &config)
    }
}
