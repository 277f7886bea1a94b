use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::Float64Array;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const PLANCK: f64 = 6.626_070_15e-34;
const LIGHT_SPEED: f64 = 2.997_924_58e8;
const BOLTZMANN: f64 = 1.380_649e-23;
const SUN_TEMPERATURE_K: f64 = 5778.0;
const SUN_RADIUS_M: f64 = 6.957e8;
const AU_M: f64 = 1.495_978_707e11;

/// Strong Fraunhofer features: (centre nm, width nm, depth 0..1).
const ABSORPTION_LINES: [(f64, f64, f64); 10] = [
    (393.37, 0.8, 0.85),  // Ca II K
    (396.85, 0.8, 0.80),  // Ca II H
    (430.78, 0.5, 0.45),  // G band
    (486.13, 0.4, 0.55),  // H-beta
    (517.27, 0.3, 0.40),  // Mg b
    (589.29, 0.3, 0.60),  // Na D
    (656.28, 0.4, 0.65),  // H-alpha
    (687.0, 1.0, 0.50),   // O2 B
    (759.4, 1.5, 0.70),   // O2 A
    (1400.0, 25.0, 0.80), // H2O
];

/// Sun as a black body, as irradiance at 1 AU in W/m²/nm.
fn solar_irradiance(wavelength_nm: f64) -> f64 {
    let lambda = wavelength_nm * 1e-9;
    let radiance = 2.0 * PLANCK * LIGHT_SPEED.powi(2)
        / lambda.powi(5)
        / ((PLANCK * LIGHT_SPEED / (lambda * BOLTZMANN * SUN_TEMPERATURE_K)).exp() - 1.0);
    let dilution = std::f64::consts::PI * (SUN_RADIUS_M / AU_M).powi(2);
    radiance * dilution * 1e-9
}

fn absorption(wavelength_nm: f64) -> f64 {
    ABSORPTION_LINES
        .iter()
        .map(|&(mu, sigma, depth)| {
            1.0 - depth * (-(wavelength_nm - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
        })
        .product()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);

    // 280 → 4000 nm in 0.5 nm steps
    let wavelengths: Vec<f64> = (0..7440).map(|i| 280.0 + f64::from(i) * 0.5).collect();
    let smooth: Vec<f64> = wavelengths
        .iter()
        .map(|&nm| solar_irradiance(nm) * absorption(nm))
        .collect();
    let measured: Vec<f64> = smooth
        .iter()
        .map(|&v| (v * (1.0 + rng.gauss(0.0, 0.02))).max(0.0))
        .collect();

    // Tab-separated, same column layout as the NREL tables
    let tsv_path = "sample_spectrum.txt";
    let file = std::fs::File::create(tsv_path).context("creating TSV output")?;
    let mut out = std::io::BufWriter::new(file);
    writeln!(out, "cm-1\tnm\tSynthetic\tSyntheticSmooth")?;
    for ((nm, m), s) in wavelengths.iter().zip(&measured).zip(&smooth) {
        writeln!(out, "{:.2}\t{nm:.2}\t{m:.6e}\t{s:.6e}", 1e7 / nm)?;
    }
    out.flush()?;

    // Parquet with the two columns the loader reads
    let schema = Arc::new(Schema::new(vec![
        Field::new("wavelength_nm", DataType::Float64, false),
        Field::new("intensity", DataType::Float64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(wavelengths.clone())),
            Arc::new(Float64Array::from(measured)),
        ],
    )
    .context("building record batch")?;

    let parquet_path = "sample_spectrum.parquet";
    let file = std::fs::File::create(parquet_path).context("creating parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;

    log::info!(
        "Wrote {} samples to {tsv_path} and {parquet_path}",
        wavelengths.len()
    );
    Ok(())
}
