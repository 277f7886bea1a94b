use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{ImageFormat, RgbImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{self, fontdb};
use tempfile::NamedTempFile;

use super::svg::FontFace;
use crate::error::RenderError;

// ---------------------------------------------------------------------------
// Fonts
// ---------------------------------------------------------------------------

/// Font database shared by every rasterization in a run.
#[derive(Clone)]
pub struct FontBook {
    db: Arc<fontdb::Database>,
}

impl Default for FontBook {
    fn default() -> Self {
        Self {
            db: Arc::new(fontdb::Database::new()),
        }
    }
}

impl FontBook {
    /// Load a font file and return the family/weight that selects it.
    pub fn load(&mut self, path: &Path) -> Result<FontFace, RenderError> {
        if !path.is_file() {
            return Err(RenderError::MissingFont(path.to_path_buf()));
        }
        let data = std::fs::read(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let db = Arc::make_mut(&mut self.db);
        let before = db.len();
        db.load_font_data(data);
        let face = db
            .faces()
            .nth(before)
            .and_then(|face| {
                let (family, _) = face.families.first()?;
                Some(FontFace {
                    family: family.clone(),
                    weight: face.weight.0,
                })
            })
            .ok_or_else(|| RenderError::UnusableFont(path.to_path_buf()))?;

        log::debug!(
            "loaded font {} as '{}' weight {}",
            path.display(),
            face.family,
            face.weight
        );
        Ok(face)
    }
}

// ---------------------------------------------------------------------------
// SVG → pixels
// ---------------------------------------------------------------------------

/// Rasterize an SVG document at 1 px per user unit onto an opaque RGB image.
pub fn rasterize(svg: &str, fonts: &FontBook) -> Result<RgbImage, RenderError> {
    let options = usvg::Options {
        fontdb: Arc::clone(&fonts.db),
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_str(svg, &options)?;

    let size = tree.size().to_int_size();
    let (width, height) = (size.width(), size.height());
    let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::Canvas { width, height })?;
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

    let pixels: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue()]
        })
        .collect();
    RgbImage::from_raw(width, height, pixels).ok_or(RenderError::Canvas { width, height })
}

// ---------------------------------------------------------------------------
// Output files
// ---------------------------------------------------------------------------

/// An output written to a temporary file next to its destination, not yet
/// visible under its final name.
pub struct StagedFile {
    tmp: NamedTempFile,
    dest: PathBuf,
}

impl StagedFile {
    pub fn new<F>(dest: &Path, write: F) -> Result<Self, RenderError>
    where
        F: FnOnce(&mut File) -> Result<(), RenderError>,
    {
        let dir = dest
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir).map_err(|source| io_error(dest, source))?;
        write(tmp.as_file_mut())?;
        tmp.as_file_mut()
            .flush()
            .map_err(|source| io_error(dest, source))?;
        Ok(Self {
            tmp,
            dest: dest.to_path_buf(),
        })
    }

    pub fn svg(dest: &Path, svg: &str) -> Result<Self, RenderError> {
        Self::new(dest, |f| {
            f.write_all(svg.as_bytes())
                .map_err(|source| io_error(dest, source))
        })
    }

    pub fn png(dest: &Path, image: &RgbImage) -> Result<Self, RenderError> {
        Self::new(dest, |f| Ok(image.write_to(f, ImageFormat::Png)?))
    }

    /// Move the file to its final name.
    pub fn commit(self) -> Result<PathBuf, RenderError> {
        self.tmp
            .persist(&self.dest)
            .map_err(|e| io_error(&self.dest, e.error))?;
        Ok(self.dest)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> RenderError {
    RenderError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use palette::Srgb;

    use super::*;
    use crate::render::svg::SvgDocument;

    #[test]
    fn rasterizes_lines_with_alpha_over_black() {
        let mut doc = SvgDocument::new(4, 2);
        doc.line((0.5, 0.0), (0.5, 2.0), Srgb::new(255, 255, 255), 255);
        doc.line((2.5, 0.0), (2.5, 2.0), Srgb::new(255, 0, 0), 128);
        let img = rasterize(&doc.finish(), &FontBook::default()).unwrap();

        assert_eq!(img.dimensions(), (4, 2));
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(img.get_pixel(1, 1).0, [0, 0, 0]);
        let half_red = img.get_pixel(2, 0).0;
        assert!((120..=136).contains(&half_red[0]), "{half_red:?}");
        assert_eq!(&half_red[1..], &[0, 0]);
    }

    #[test]
    fn missing_font_is_reported() {
        let mut book = FontBook::default();
        let err = book.load(Path::new("/definitely/not/here.ttf")).unwrap_err();
        assert!(matches!(err, RenderError::MissingFont(_)));
    }

    #[test]
    fn non_font_file_is_unusable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.ttf");
        std::fs::write(&path, b"not a font").unwrap();
        let err = FontBook::default().load(&path).unwrap_err();
        assert!(matches!(err, RenderError::UnusableFont(_)));
    }

    #[test]
    fn staged_files_appear_only_on_commit() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.svg");
        let staged = StagedFile::svg(&dest, "<svg/>").unwrap();
        assert!(!dest.exists());
        assert_eq!(staged.commit().unwrap(), dest);
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "<svg/>");
    }

    #[test]
    fn failed_write_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.png");
        let result = StagedFile::new(&dest, |_| Err(RenderError::EmptyFrame));
        assert!(result.is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
