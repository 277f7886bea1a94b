//! Rendering: frames → SVG document → PNG.
//!
//! ```text
//!   SpectrumFrame
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  layout   │  tiled / fade strip → SvgDocument
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  raster   │  resvg → RgbImage, staged files → <name>.svg + <name>.png
//!   └──────────┘
//! ```

pub mod layout;
pub mod raster;
pub mod svg;

use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::config::{Caption, Fonts, Layout, OutputMode, SpectrumConfig};
use crate::error::RenderError;
use crate::pipeline::SpectrumFrame;
use layout::TextFaces;
use raster::{rasterize, FontBook, StagedFile};

/// A drawn frame, not yet written anywhere.
pub struct Drawing {
    pub svg: String,
    pub raster: RgbImage,
}

/// Paths of the files written for one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFiles {
    pub svg: PathBuf,
    pub png: PathBuf,
}

impl Drawing {
    /// Write `<stem>.svg` and `<stem>.png`. Both are staged first and the PNG
    /// is removed again if the SVG cannot be committed, so an error leaves
    /// neither behind.
    pub fn write(&self, stem: &Path) -> Result<OutputFiles, RenderError> {
        let svg_path = with_suffix(stem, "svg");
        let png_path = with_suffix(stem, "png");
        let svg = StagedFile::svg(&svg_path, &self.svg)?;
        let png = StagedFile::png(&png_path, &self.raster)?;

        let png = png.commit()?;
        let svg = match svg.commit() {
            Ok(svg) => svg,
            Err(e) => {
                if let Err(rm) = std::fs::remove_file(&png) {
                    log::warn!("could not remove {}: {rm}", png.display());
                }
                return Err(e);
            }
        };
        Ok(OutputFiles { svg, png })
    }
}

/// `<stem>.<ext>`, keeping any dots already in the stem.
fn with_suffix(stem: &Path, ext: &str) -> PathBuf {
    let mut name = stem.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// Draws frames with one layout, caption and set of fonts.
pub struct Renderer {
    layout: Layout,
    caption: Caption,
    fonts: FontBook,
    faces: Option<TextFaces>,
    /// Reported when an annotated frame is drawn without faces.
    text_font: PathBuf,
}

impl Renderer {
    /// Renderer that cannot draw text; annotated frames fail with
    /// [`RenderError::MissingFont`].
    pub fn without_text(layout: Layout, caption: Caption) -> Self {
        Self {
            layout,
            caption,
            fonts: FontBook::default(),
            faces: None,
            text_font: Fonts::default().regular,
        }
    }

    /// Renderer with both fonts loaded. A missing or unreadable font file is
    /// an error.
    pub fn with_fonts(layout: Layout, caption: Caption, fonts: &Fonts) -> Result<Self, RenderError> {
        let mut book = FontBook::default();
        let regular = book.load(&fonts.regular)?;
        let bold = book.load(&fonts.bold)?;
        Ok(Self {
            layout,
            caption,
            fonts: book,
            faces: Some(TextFaces { regular, bold }),
            text_font: fonts.regular.clone(),
        })
    }

    /// Renderer for a whole run: fonts are only loaded when some job
    /// draws text.
    pub fn for_config(config: &SpectrumConfig) -> Result<Self, RenderError> {
        let layout = config.layout.clone();
        let caption = config.caption.clone();
        if config.jobs.iter().any(|j| j.params.annotate) {
            Self::with_fonts(layout, caption, &config.fonts)
        } else {
            Ok(Self {
                text_font: config.fonts.regular.clone(),
                ..Self::without_text(layout, caption)
            })
        }
    }

    pub fn draw(&self, frame: &SpectrumFrame) -> Result<Drawing, RenderError> {
        if frame.is_empty() {
            return Err(RenderError::EmptyFrame);
        }
        let text = if frame.params.annotate {
            match &self.faces {
                Some(faces) => Some(faces),
                None => return Err(RenderError::MissingFont(self.text_font.clone())),
            }
        } else {
            None
        };

        let doc = match frame.params.output_mode {
            OutputMode::Tiled => layout::tiled(frame, &self.layout, &self.caption, text),
            OutputMode::Fade => layout::fade(frame, &self.layout, text),
        };
        log::debug!(
            "drawing {:?} strip of {}x{} px",
            frame.params.output_mode,
            doc.width(),
            doc.height()
        );
        let svg = doc.finish();
        let raster = rasterize(&svg, &self.fonts)?;
        Ok(Drawing { svg, raster })
    }
}
