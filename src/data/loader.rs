use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, Float32Array, Float64Array};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{Observation, ReflectanceTable};

/// Name of the wavelength column in JSON and Parquet inputs.
pub const WAVELENGTH_COLUMN: &str = "wavelength";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a reflectance table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – a `wavelength` column plus one float column per observation
/// * `.json`    – `{ "wavelength": [...], "observations": [{ "id", "reflectance" }] }`
/// * `.csv`     – first column wavelength, one column per observation
///
/// Missing values (empty CSV cells, JSON `null`, Parquet nulls) become `NaN`
/// and are skipped during convolution.
pub fn load_reflectance(path: &Path) -> Result<ReflectanceTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::debug!(
        "loaded {} observations over {} wavelengths from {}",
        table.len(),
        table.wavelengths().len(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct JsonTable {
    wavelength: Vec<f64>,
    observations: Vec<JsonObservation>,
}

#[derive(Debug, Deserialize)]
struct JsonObservation {
    id: String,
    reflectance: Vec<Option<f64>>,
}

/// Expected JSON schema:
///
/// ```json
/// {
///   "wavelength": [400.0, 401.0, ...],
///   "observations": [
///     { "id": "lake_01", "reflectance": [0.012, 0.013, null, ...] },
///     ...
///   ]
/// }
/// ```
fn load_json(path: &Path) -> Result<ReflectanceTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let parsed: JsonTable = serde_json::from_str(&text).context("parsing JSON")?;

    let observations = parsed
        .observations
        .into_iter()
        .map(|obs| Observation {
            id: obs.id,
            reflectance: obs
                .reflectance
                .into_iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect(),
        })
        .collect();

    Ok(ReflectanceTable::new(parsed.wavelength, observations)?)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row, wavelength in the first column, one column per
/// observation named by its id.
///
/// ```text
/// wavelength,lake_01,lake_02
/// 400,0.012,0.018
/// 401,0.013,
/// ```
fn load_csv(path: &Path) -> Result<ReflectanceTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.len() < 2 {
        bail!("CSV needs a wavelength column and at least one observation column");
    }

    let mut wavelengths = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len() - 1];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let wl = record.get(0).unwrap_or("").trim();
        wavelengths.push(
            wl.parse::<f64>()
                .with_context(|| format!("Row {row_no}: wavelength '{wl}' is not a number"))?,
        );

        for (col, column) in columns.iter_mut().enumerate() {
            let cell = record.get(col + 1).unwrap_or("").trim();
            column.push(parse_optional_float(cell, row_no, &headers[col + 1])?);
        }
    }

    let observations = headers
        .into_iter()
        .skip(1)
        .zip(columns)
        .map(|(id, reflectance)| Observation { id, reflectance })
        .collect();

    Ok(ReflectanceTable::new(wavelengths, observations)?)
}

fn parse_optional_float(s: &str, row: usize, col: &str) -> Result<f64> {
    if s.is_empty() || s.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    s.parse::<f64>()
        .with_context(|| format!("Row {row}, {col}: '{s}' is not a number"))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file in wide layout.
///
/// Expected schema:
/// - `wavelength`: Float64 or Float32
/// - every other Float64/Float32 column is one observation; other column
///   types are skipped
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<ReflectanceTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut wavelengths: Vec<f64> = Vec::new();
    let mut ids: Vec<String> = Vec::new();
    let mut columns: Vec<Vec<f64>> = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let wl_idx = schema
            .index_of(WAVELENGTH_COLUMN)
            .map_err(|_| anyhow::anyhow!("Parquet file missing '{WAVELENGTH_COLUMN}' column"))?;

        let obs_cols: Vec<(usize, String)> = schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(i, f)| {
                *i != wl_idx && matches!(f.data_type(), DataType::Float64 | DataType::Float32)
            })
            .map(|(i, f)| (i, f.name().clone()))
            .collect();

        // Schema is fixed across batches; take ids from the first one.
        if ids.is_empty() {
            ids = obs_cols.iter().map(|(_, name)| name.clone()).collect();
            columns = vec![Vec::new(); ids.len()];
        } else if ids.len() != obs_cols.len() {
            bail!("Parquet batches disagree on the observation columns");
        }

        let wl = extract_f64(batch.column(wl_idx))
            .with_context(|| format!("reading '{WAVELENGTH_COLUMN}'"))?;
        if wl.iter().any(|v| v.is_nan()) {
            bail!("null wavelength in '{WAVELENGTH_COLUMN}' column");
        }
        wavelengths.extend(wl);

        for ((col_idx, name), column) in obs_cols.iter().zip(columns.iter_mut()) {
            let values = extract_f64(batch.column(*col_idx))
                .with_context(|| format!("reading observation '{name}'"))?;
            column.extend(values);
        }
    }

    let observations = ids
        .into_iter()
        .zip(columns)
        .map(|(id, reflectance)| Observation { id, reflectance })
        .collect();

    Ok(ReflectanceTable::new(wavelengths, observations)?)
}

// -- Parquet / Arrow helpers --

/// Extract a Float64 or Float32 column as `f64`, nulls as `NaN`.
fn extract_f64(col: &Arc<dyn Array>) -> Result<Vec<f64>> {
    if let Some(f64_arr) = col.as_any().downcast_ref::<Float64Array>() {
        Ok(f64_arr.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    } else if let Some(f32_arr) = col.as_any().downcast_ref::<Float32Array>() {
        Ok(f32_arr
            .iter()
            .map(|v| v.map_or(f64::NAN, f64::from))
            .collect())
    } else {
        bail!("column type is {:?}, expected Float64 or Float32", col.data_type())
    }
}
