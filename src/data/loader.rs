use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use arrow::array::{Array, ArrayRef, Float32Array, Float64Array};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{SpectralSample, SpectralTable};

/// Zero-based column holding the wavelength in nm (column 1 is wavenumber).
const WAVELENGTH_COLUMN: usize = 1;
/// Zero-based column holding the intensity used for alpha.
const INTENSITY_COLUMN: usize = 2;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a spectral table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.txt` / `.tsv` – tab-separated, header row, `wavenumber  nm  intensity  …`
/// * `.csv`          – same layout, comma-separated
/// * `.json`         – `[{ "wavelength_nm": 500.0, "intensity": 1.9 }, ...]`
/// * `.parquet`      – `wavelength_nm` and `intensity` float columns
///
/// A table without any data row is an error: there is nothing to draw.
pub fn load_file(path: &Path) -> Result<SpectralTable> {
    ensure!(path.is_file(), "input table {} does not exist", path.display());

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let samples = match ext.as_str() {
        "txt" | "tsv" | "dat" => load_delimited(path, b'\t')?,
        "csv" => load_delimited(path, b',')?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    ensure!(
        !samples.is_empty(),
        "{} has a header but no data rows",
        path.display()
    );
    log::info!("Loaded {} samples from {}", samples.len(), path.display());
    Ok(SpectralTable::new(samples, path))
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Header row, then one sample per row. Only columns 2 and 3 are read; the
/// reference-dataset columns after them may be missing or ragged.
fn load_delimited(path: &Path, delimiter: u8) -> Result<Vec<SpectralSample>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut samples = Vec::new();
    for (i, result) in reader.records().enumerate() {
        // Row numbers are reported 1-based and count the header.
        let row_no = i + 2;
        let record = result.with_context(|| format!("reading row {row_no}"))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        ensure!(
            record.len() > INTENSITY_COLUMN,
            "row {row_no}: expected at least {} columns, found {}",
            INTENSITY_COLUMN + 1,
            record.len()
        );

        let wavelength_nm = parse_cell(record.get(WAVELENGTH_COLUMN), row_no, "wavelength")?;
        let intensity = parse_cell(record.get(INTENSITY_COLUMN), row_no, "intensity")?;
        samples.push(SpectralSample::new(wavelength_nm, intensity));
    }
    Ok(samples)
}

fn parse_cell(cell: Option<&str>, row: usize, col: &str) -> Result<f64> {
    let text = cell.unwrap_or("");
    let value = text
        .parse::<f64>()
        .with_context(|| format!("row {row}, {col}: '{text}' is not a number"))?;
    ensure!(value.is_finite(), "row {row}, {col}: '{text}' is not finite");
    Ok(value)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct JsonRow {
    wavelength_nm: f64,
    intensity: f64,
}

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "wavelength_nm": 280.0, "intensity": 0.0000082 },
///   { "wavelength_nm": 280.5, "intensity": 0.0000099 }
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<SpectralSample>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let rows: Vec<JsonRow> = serde_json::from_str(&text).context("parsing JSON")?;

    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            ensure!(
                row.wavelength_nm.is_finite() && row.intensity.is_finite(),
                "record {i}: non-finite value"
            );
            Ok(SpectralSample::new(row.wavelength_nm, row.intensity))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat `wavelength_nm` and `intensity` columns
/// (Float64 or Float32). Any other columns are ignored.
fn load_parquet(path: &Path) -> Result<Vec<SpectralSample>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut samples = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let wl_idx = schema
            .index_of("wavelength_nm")
            .map_err(|_| anyhow::anyhow!("Parquet file missing 'wavelength_nm' column"))?;
        let int_idx = schema
            .index_of("intensity")
            .map_err(|_| anyhow::anyhow!("Parquet file missing 'intensity' column"))?;

        let wavelengths = float_column(batch.column(wl_idx)).context("column 'wavelength_nm'")?;
        let intensities = float_column(batch.column(int_idx)).context("column 'intensity'")?;

        for (row, (wl, int)) in wavelengths.into_iter().zip(intensities).enumerate() {
            match (wl, int) {
                (Some(w), Some(i)) if w.is_finite() && i.is_finite() => {
                    samples.push(SpectralSample::new(w, i));
                }
                _ => bail!("Row {row}: null or non-finite value"),
            }
        }
    }
    Ok(samples)
}

/// Read a Float64 or Float32 column into optional f64 values.
fn float_column(col: &ArrayRef) -> Result<Vec<Option<f64>>> {
    match col.data_type() {
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            Ok(arr.iter().collect())
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            Ok(arr.iter().map(|v| v.map(f64::from)).collect())
        }
        other => bail!("expected Float64 or Float32 column, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn reads_wavelength_and_intensity_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "AllMODEtr.txt",
            "cm-1\tnm\tMCebKur\tMNewKur\n\
             35714.3\t280.0\t8.2e-6\t9.1e-6\n\
             35650.6\t280.5\t9.9e-6\n",
        );
        let table = load_file(&path).unwrap();
        assert_eq!(
            table.samples(),
            &[
                SpectralSample::new(280.0, 8.2e-6),
                SpectralSample::new(280.5, 9.9e-6)
            ]
        );
    }

    #[test]
    fn rejects_short_rows_with_row_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "short.tsv", "cm-1\tnm\tI\n1\t500\t1\n2\t501\n");
        let err = load_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("row 3"), "got: {err:#}");
    }

    #[test]
    fn rejects_non_numeric_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "bad.tsv", "cm-1\tnm\tI\n1\tabc\t1\n");
        let err = load_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("'abc' is not a number"), "got: {err:#}");
    }

    #[test]
    fn rejects_header_only_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "empty.tsv", "cm-1\tnm\tI\n");
        assert!(load_file(&path).is_err());
        assert!(load_file(&dir.path().join("nope.tsv")).is_err());
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "table.xlsx", "x");
        let err = load_file(&path).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }

    #[test]
    fn reads_csv_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let csv = write(&dir, "t.csv", "cm-1,nm,I\n20000,500,1.5\n");
        assert_eq!(load_file(&csv).unwrap().samples()[0], SpectralSample::new(500.0, 1.5));

        let json = write(
            &dir,
            "t.json",
            r#"[{"wavelength_nm": 400.0, "intensity": 2.0}]"#,
        );
        assert_eq!(load_file(&json).unwrap().samples()[0], SpectralSample::new(400.0, 2.0));
    }

    #[test]
    fn reads_parquet_float_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.parquet");
        let schema = Arc::new(Schema::new(vec![
            Field::new("wavelength_nm", DataType::Float64, false),
            Field::new("intensity", DataType::Float32, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Float64Array::from(vec![500.0, 501.0])),
                Arc::new(Float32Array::from(vec![1.0_f32, 2.0])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.samples()[1], SpectralSample::new(501.0, 2.0));
    }
}
