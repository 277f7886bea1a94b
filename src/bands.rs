use palette::Srgb;

use crate::data::model::ColorSample;

// ---------------------------------------------------------------------------
// Band catalog
// ---------------------------------------------------------------------------

/// Colours used when a band is drawn as an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandColors {
    pub background: Srgb<u8>,
    /// Overlay opacity, 0..=255.
    pub background_alpha: u8,
    pub text: Srgb<u8>,
}

/// A named wavelength interval. Membership is strict on both ends:
/// `start_nm < wavelength < end_nm`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandRegion {
    pub key: &'static str,
    pub label: &'static str,
    pub start_nm: f64,
    pub end_nm: f64,
    pub colors: BandColors,
}

impl BandRegion {
    pub fn contains(&self, wavelength_nm: f64) -> bool {
        self.start_nm < wavelength_nm && wavelength_nm < self.end_nm
    }
}

const fn colors(background: (u8, u8, u8), background_alpha: u8) -> BandColors {
    BandColors {
        background: Srgb::new(background.0, background.1, background.2),
        background_alpha,
        text: Srgb::new(255, 255, 255),
    }
}

pub const CATALOG: [BandRegion; 4] = [
    BandRegion {
        key: "uv",
        label: "UV",
        start_nm: 10.0,
        end_nm: 400.0,
        colors: colors((110, 40, 170), 70),
    },
    BandRegion {
        key: "visible",
        label: "Visible",
        start_nm: 400.0,
        end_nm: 700.0,
        colors: colors((230, 230, 230), 40),
    },
    BandRegion {
        key: "ir",
        label: "IR",
        start_nm: 700.0,
        end_nm: 1000.0,
        colors: colors((150, 20, 20), 70),
    },
    BandRegion {
        key: "radio",
        label: "Radio Waves",
        start_nm: 1000.0,
        end_nm: 1.0e9,
        colors: colors((60, 60, 90), 90),
    },
];

// ---------------------------------------------------------------------------
// Annotations
// ---------------------------------------------------------------------------

/// Where one band's samples begin and end in an aggregated sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub key: &'static str,
    pub label: &'static str,
    /// Index of the first sample inside the band.
    pub start_index: usize,
    /// Index one past the last sample inside the band.
    pub end_index: usize,
    /// Wavelength of the first sample inside the band.
    pub start_nm: f64,
    /// Wavelength of the last sample inside the band.
    pub end_nm: f64,
    pub colors: BandColors,
}

impl Annotation {
    /// Label text, one entry per line: the band name and its range.
    pub fn text_lines(&self) -> Vec<String> {
        vec![
            self.label.to_string(),
            format!(
                "{} – {}",
                format_wavelength(self.start_nm),
                format_wavelength(self.end_nm)
            ),
        ]
    }

    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `656.28nm`, `1.2µm`: values from 1000 nm up are shown in micrometers.
pub fn format_wavelength(nm: f64) -> String {
    let round2 = |v: f64| (v * 100.0).round() / 100.0;
    if nm.abs() >= 1000.0 {
        format!("{}µm", round2(nm / 1000.0))
    } else {
        format!("{}nm", round2(nm))
    }
}

#[derive(Debug, Clone, Copy)]
enum RegionState {
    Inactive,
    Active {
        start_index: usize,
        start_nm: f64,
        last_nm: f64,
    },
}

/// Scan `samples` once and report every stretch of consecutive samples that
/// falls inside a catalog band, ordered by where the stretch starts.
///
/// Each band is tracked on its own, so a band that is left and entered again
/// yields one annotation per stretch.
pub fn annotate(samples: &[ColorSample], catalog: &[BandRegion]) -> Vec<Annotation> {
    let mut states = vec![RegionState::Inactive; catalog.len()];
    let mut out = Vec::new();

    let close = |region: &BandRegion, state: RegionState, end_index: usize| match state {
        RegionState::Active {
            start_index,
            start_nm,
            last_nm,
        } => Some(Annotation {
            key: region.key,
            label: region.label,
            start_index,
            end_index,
            start_nm,
            end_nm: last_nm,
            colors: region.colors,
        }),
        RegionState::Inactive => None,
    };

    for (index, sample) in samples.iter().enumerate() {
        let nm = sample.wavelength_nm();
        for (region, state) in catalog.iter().zip(states.iter_mut()) {
            *state = match (*state, region.contains(nm)) {
                (RegionState::Inactive, true) => RegionState::Active {
                    start_index: index,
                    start_nm: nm,
                    last_nm: nm,
                },
                (RegionState::Active { start_index, start_nm, .. }, true) => {
                    RegionState::Active {
                        start_index,
                        start_nm,
                        last_nm: nm,
                    }
                }
                (active @ RegionState::Active { .. }, false) => {
                    out.extend(close(region, active, index));
                    RegionState::Inactive
                }
                (RegionState::Inactive, false) => RegionState::Inactive,
            };
        }
    }

    for (region, state) in catalog.iter().zip(states) {
        out.extend(close(region, state, samples.len()));
    }

    out.sort_by_key(|a| a.start_index);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sweep(from: u32, to: u32) -> Vec<ColorSample> {
        (from..to)
            .map(|nm| ColorSample::new(f64::from(nm), Srgb::new(1, 1, 1), 1))
            .collect()
    }

    #[test]
    fn sweep_from_uv_to_radio_yields_four_bands() {
        let samples = sweep(300, 1200);
        let notes = annotate(&samples, &CATALOG);
        let labels: Vec<&str> = notes.iter().map(|a| a.label).collect();
        assert_eq!(labels, vec!["UV", "Visible", "IR", "Radio Waves"]);
        assert!(notes.iter().all(|a| a.start_index < a.end_index));

        let visible = &notes[1];
        assert_eq!(visible.start_nm, 401.0);
        assert_eq!(visible.end_nm, 699.0);
        assert_eq!(visible.start_index, 101);
        assert_eq!(visible.end_index, 400);
        assert_eq!(notes[3].end_index, samples.len());
    }

    #[test]
    fn boundaries_are_exclusive() {
        let samples = sweep(400, 401);
        assert!(annotate(&samples, &CATALOG).is_empty());
    }

    #[test]
    fn reentering_a_band_gives_a_second_annotation() {
        let mut samples = sweep(500, 510);
        samples.extend(sweep(800, 805));
        samples.extend(sweep(600, 603));
        let notes = annotate(&samples, &CATALOG);
        let spans: Vec<(&str, usize, usize)> = notes
            .iter()
            .map(|a| (a.key, a.start_index, a.end_index))
            .collect();
        assert_eq!(
            spans,
            vec![("visible", 0, 10), ("ir", 10, 15), ("visible", 15, 18)]
        );
    }

    #[test]
    fn labels_switch_units_at_one_micrometer() {
        assert_eq!(format_wavelength(656.28), "656.28nm");
        assert_eq!(format_wavelength(400.0), "400nm");
        assert_eq!(format_wavelength(1200.0), "1.2µm");
        assert_eq!(format_wavelength(2500.0), "2.5µm");

        let note = annotate(&sweep(900, 1100), &CATALOG).pop().unwrap();
        assert_eq!(note.text_lines(), vec!["Radio Waves", "1µm – 1.1µm"]);
    }
}
