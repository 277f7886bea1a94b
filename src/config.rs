use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::color::ColorModel;
use crate::data::filter::Window;
use crate::data::normalize::Normalization;

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "sun-spectrum.json";

// ---------------------------------------------------------------------------
// Per-job parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Samples wrapped into rows of vertical lines.
    #[default]
    Tiled,
    /// One vertical gradient, a horizontal line per sample.
    Fade,
}

/// Everything that shapes one rendered spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    /// Bucket width in nm.
    pub step_nm: f64,
    pub min_nm: Option<f64>,
    pub max_nm: Option<f64>,
    pub percentile_bottom: f64,
    pub percentile_top: f64,
    pub normalization: Normalization,
    pub color: ColorModel,
    pub output_mode: OutputMode,
    /// Overlay band labels and caption text.
    pub annotate: bool,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            step_nm: 1.0,
            min_nm: None,
            max_nm: None,
            percentile_bottom: 5.0,
            percentile_top: 99.0,
            normalization: Normalization::PercentileRatio,
            color: ColorModel::default(),
            output_mode: OutputMode::Tiled,
            annotate: false,
        }
    }
}

impl PipelineParams {
    pub fn window(&self) -> Window {
        Window::new(self.min_nm, self.max_nm)
    }
}

/// One named output: `<name>.svg` and `<name>.png`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderJob {
    pub name: String,
    #[serde(default)]
    pub params: PipelineParams,
}

impl RenderJob {
    pub fn new(name: &str, params: PipelineParams) -> Self {
        Self {
            name: name.to_string(),
            params,
        }
    }
}

// ---------------------------------------------------------------------------
// Layout and text
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Samples per row in tiled mode.
    pub row_width: u32,
    pub row_height: u32,
    /// Strip width in fade mode.
    pub fade_width: u32,
    pub font_size: f32,
    pub title_size: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            row_width: 800,
            row_height: 50,
            fade_width: 600,
            font_size: 36.0,
            title_size: 40.0,
        }
    }
}

/// Text drawn on annotated tiled strips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Caption {
    pub title: String,
    pub description: Vec<String>,
    /// Extra lines shown next to a band's label, keyed by band key.
    pub band_notes: BTreeMap<String, Vec<String>>,
    /// Lines drawn under the last row.
    pub footer: Vec<String>,
}

fn lines(text: &[&str]) -> Vec<String> {
    text.iter().map(|l| l.to_string()).collect()
}

impl Default for Caption {
    fn default() -> Self {
        Self {
            title: "The Sun's Fingerprint".to_string(),
            description: lines(&[
                "This is the spectrum of electromagnetic radiation",
                "that our star, the sun, outputs. The gaps that",
                "you see below are 'absorption lines'. Certain",
                "elements absorb different parts of the spectrum.",
                "This is one way that we know what the sun",
                "is made of.",
            ]),
            band_notes: BTreeMap::from([
                (
                    "ir".to_string(),
                    lines(&[
                        "Human eyes can't detect this frequency",
                        "but the sun still emits in it.",
                    ]),
                ),
                ("visible".to_string(), lines(&["Visible light starts here."])),
                ("uv".to_string(), lines(&["We don't see this either."])),
            ]),
            footer: lines(&[
                "It falls off pretty quickly. We aren't even close",
                "to X-Rays or Gamma waves. Only extremely",
                "powerful cosmic events produce emissions",
                "at these wavelengths.",
            ]),
        }
    }
}

/// Font files used for any text in the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fonts {
    pub regular: PathBuf,
    pub bold: PathBuf,
}

impl Default for Fonts {
    fn default() -> Self {
        Self {
            regular: PathBuf::from("Roboto-Medium.ttf"),
            bold: PathBuf::from("Roboto-Bold.ttf"),
        }
    }
}

// ---------------------------------------------------------------------------
// Whole-run configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrumConfig {
    /// Source table (NREL `AllMODEtr.txt` layout by default).
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub fonts: Fonts,
    pub layout: Layout,
    pub caption: Caption,
    pub jobs: Vec<RenderJob>,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        let base = PipelineParams::default();
        Self {
            input: PathBuf::from("AllMODEtr.txt"),
            output_dir: PathBuf::from("."),
            fonts: Fonts::default(),
            layout: Layout::default(),
            caption: Caption::default(),
            jobs: vec![
                RenderJob::new("sun-spectrum", base),
                RenderJob::new(
                    "sun-spectrum-annotated",
                    PipelineParams {
                        annotate: true,
                        ..base
                    },
                ),
                RenderJob::new(
                    "sun-spectrum-visible",
                    PipelineParams {
                        step_nm: 0.1,
                        min_nm: Some(380.0),
                        max_nm: Some(750.0),
                        ..base
                    },
                ),
                RenderJob::new(
                    "sun-spectrum-fade",
                    PipelineParams {
                        min_nm: Some(250.0),
                        max_nm: Some(2500.0),
                        output_mode: OutputMode::Fade,
                        annotate: true,
                        ..base
                    },
                ),
            ],
        }
    }
}

impl SpectrumConfig {
    /// Read a JSON config. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Config for a run: `explicit` if given, else [`DEFAULT_CONFIG_FILE`]
    /// when it exists, else the built-in defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => {
                log::info!("No {DEFAULT_CONFIG_FILE} found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Where a job's files go, without extension.
    pub fn output_stem(&self, job: &RenderJob) -> PathBuf {
        self.output_dir.join(&job.name)
    }
}
