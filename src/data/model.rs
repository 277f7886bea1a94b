use std::path::{Path, PathBuf};

use palette::Srgb;

// ---------------------------------------------------------------------------
// SpectralSample – one row of the source table
// ---------------------------------------------------------------------------

/// A single measurement: wavelength and the intensity recorded there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralSample {
    pub wavelength_nm: f64,
    pub intensity: f64,
}

impl SpectralSample {
    pub const fn new(wavelength_nm: f64, intensity: f64) -> Self {
        Self {
            wavelength_nm,
            intensity,
        }
    }
}

// ---------------------------------------------------------------------------
// SpectralTable – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table, kept in source order.
#[derive(Debug, Clone)]
pub struct SpectralTable {
    samples: Vec<SpectralSample>,
    source: PathBuf,
}

impl SpectralTable {
    pub fn new(samples: Vec<SpectralSample>, source: impl Into<PathBuf>) -> Self {
        Self {
            samples,
            source: source.into(),
        }
    }

    pub fn samples(&self) -> &[SpectralSample] {
        &self.samples
    }

    /// File the table was read from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Smallest and largest wavelength in the table.
    pub fn wavelength_range(&self) -> Option<(f64, f64)> {
        self.samples.iter().fold(None, |acc, s| match acc {
            None => Some((s.wavelength_nm, s.wavelength_nm)),
            Some((lo, hi)) => Some((lo.min(s.wavelength_nm), hi.max(s.wavelength_nm))),
        })
    }
}

// ---------------------------------------------------------------------------
// ColorSample – a sample after color mapping and normalization
// ---------------------------------------------------------------------------

/// A displayable sample. `alpha` encodes relative intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorSample {
    /// Wavelength in hundredths of a nanometer, so buckets compare exactly.
    centi_nm: i64,
    pub color: Srgb<u8>,
    pub alpha: u8,
}

impl ColorSample {
    pub fn new(wavelength_nm: f64, color: Srgb<u8>, alpha: u8) -> Self {
        Self {
            centi_nm: to_centi_nm(wavelength_nm),
            color,
            alpha,
        }
    }

    pub(crate) const fn from_centi_nm(centi_nm: i64, color: Srgb<u8>, alpha: u8) -> Self {
        Self {
            centi_nm,
            color,
            alpha,
        }
    }

    /// Placeholder for a bucket no raw sample landed in.
    pub(crate) const fn sentinel(centi_nm: i64) -> Self {
        Self::from_centi_nm(centi_nm, Srgb::new(0, 0, 0), 0)
    }

    pub fn wavelength_nm(&self) -> f64 {
        self.centi_nm as f64 / 100.0
    }

    pub(crate) const fn centi_nm(&self) -> i64 {
        self.centi_nm
    }

    pub fn is_sentinel(&self) -> bool {
        self.alpha == 0 && self.color == Srgb::new(0, 0, 0)
    }

    /// `#rrggbb`, as used by the SVG writer.
    pub fn hex(&self) -> String {
        hex_color(self.color)
    }
}

pub fn hex_color(c: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)
}

pub(crate) fn to_centi_nm(nm: f64) -> i64 {
    (nm * 100.0).round() as i64
}
