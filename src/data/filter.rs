use serde::{Deserialize, Serialize};

use super::model::SpectralSample;

// ---------------------------------------------------------------------------
// Wavelength window: which part of the table a job looks at
// ---------------------------------------------------------------------------

/// Inclusive wavelength bounds. A missing bound means "no constraint".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub min_nm: Option<f64>,
    pub max_nm: Option<f64>,
}

impl Window {
    pub const UNBOUNDED: Self = Self {
        min_nm: None,
        max_nm: None,
    };

    pub const fn new(min_nm: Option<f64>, max_nm: Option<f64>) -> Self {
        Self { min_nm, max_nm }
    }

    /// A wavelength passes when it is within both bounds (inclusive).
    pub fn contains(&self, wavelength_nm: f64) -> bool {
        self.min_nm.map_or(true, |lo| wavelength_nm >= lo)
            && self.max_nm.map_or(true, |hi| wavelength_nm <= hi)
    }
}

/// Intensities of the samples inside the window, in table order.
pub fn windowed_intensities(samples: &[SpectralSample], window: &Window) -> Vec<f64> {
    samples
        .iter()
        .filter(|s| window.contains(s.wavelength_nm))
        .map(|s| s.intensity)
        .collect()
}
