use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use log::debug;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::de::DeserializeOwned;

use super::model::{LightCurvePoint, SpectrumPoint, TransientSample};

// ---------------------------------------------------------------------------
// Record layouts
// ---------------------------------------------------------------------------

/// A named numeric column of a tabular record.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub required: bool,
}

const fn required(name: &'static str) -> Column {
    Column {
        name,
        required: true,
    }
}

const fn optional(name: &'static str) -> Column {
    Column {
        name,
        required: false,
    }
}

/// A record that can be read from a table of numeric columns.
///
/// `from_row` receives one cell per entry of `COLUMNS`, in the same order.
/// Required cells are always `Some` (a null in a required Parquet column
/// arrives as `NaN`); optional cells are `None` when missing or empty.
pub trait TabularRecord: DeserializeOwned + Sized {
    const KIND: &'static str;
    const COLUMNS: &'static [Column];

    fn from_row(cells: &[Option<f64>]) -> Self;
}

impl TabularRecord for LightCurvePoint {
    const KIND: &'static str = "light curve";
    const COLUMNS: &'static [Column] = &[required("time"), required("magnitude"), optional("error")];

    fn from_row(cells: &[Option<f64>]) -> Self {
        LightCurvePoint {
            time: cells[0].unwrap_or(f64::NAN),
            magnitude: cells[1].unwrap_or(f64::NAN),
            error: cells[2].unwrap_or(0.0),
        }
    }
}

impl TabularRecord for SpectrumPoint {
    const KIND: &'static str = "spectrum";
    const COLUMNS: &'static [Column] = &[required("wavelength"), required("flux"), optional("error")];

    fn from_row(cells: &[Option<f64>]) -> Self {
        SpectrumPoint {
            wavelength: cells[0].unwrap_or(f64::NAN),
            flux: cells[1].unwrap_or(f64::NAN),
            error: cells[2],
        }
    }
}

impl TabularRecord for TransientSample {
    const KIND: &'static str = "transient";
    const COLUMNS: &'static [Column] = &[required("time"), required("magnitude"), required("baseline")];

    fn from_row(cells: &[Option<f64>]) -> Self {
        TransientSample {
            time: cells[0].unwrap_or(f64::NAN),
            magnitude: cells[1].unwrap_or(f64::NAN),
            baseline: cells[2].unwrap_or(f64::NAN),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a series of records from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – flat numeric columns named after the record fields
/// * `.json`    – `[{ "time": ..., "magnitude": ..., ... }, ...]`
/// * `.csv`     – header row naming the record fields
pub fn load_file<T: TabularRecord>(path: &Path) -> Result<Vec<T>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {} data from {}", T::KIND, path.display()))?;

    debug!("loaded {} {} records from {}", records.len(), T::KIND, path.display());
    Ok(records)
}

pub fn load_light_curve(path: &Path) -> Result<Vec<LightCurvePoint>> {
    load_file(path)
}

pub fn load_spectrum(path: &Path) -> Result<Vec<SpectrumPoint>> {
    load_file(path)
}

pub fn load_transient_samples(path: &Path) -> Result<Vec<TransientSample>> {
    load_file(path)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "time": 0.0, "magnitude": 12.51, "error": 0.03 },
///   { "time": 0.1, "magnitude": 12.48, "error": 0.02 },
///   ...
/// ]
/// ```
fn load_json<T: TabularRecord>(path: &Path) -> Result<Vec<T>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    serde_json::from_str(&text).context("parsing JSON records")
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per row.
/// Extra columns are ignored. An empty cell in an optional column means
/// "no value"; in a required column it is an error.
fn load_csv<T: TabularRecord>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let positions: Vec<Option<usize>> = T::COLUMNS
        .iter()
        .map(|col| {
            let pos = headers.iter().position(|h| h == col.name);
            if pos.is_none() && col.required {
                bail!("CSV missing '{}' column", col.name);
            }
            Ok(pos)
        })
        .collect::<Result<_>>()?;

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let cells: Vec<Option<f64>> = T::COLUMNS
            .iter()
            .zip(&positions)
            .map(|(col, pos)| {
                let raw = pos.and_then(|p| record.get(p)).unwrap_or("").trim();
                parse_cell(raw, row_no, col)
            })
            .collect::<Result<_>>()?;

        records.push(T::from_row(&cells));
    }

    Ok(records)
}

fn parse_cell(raw: &str, row: usize, col: &Column) -> Result<Option<f64>> {
    if raw.is_empty() {
        if col.required {
            bail!("Row {row}, '{}': empty cell in required column", col.name);
        }
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .with_context(|| format!("Row {row}, '{}': '{raw}' is not a number", col.name))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat numeric column per record field.
///
/// Column types may be Float64, Float32, Int64 or Int32, which covers
/// files written by both **Pandas** (`df.to_parquet()`) and **Polars**
/// (`df.write_parquet()`).
fn load_parquet<T: TabularRecord>(path: &Path) -> Result<Vec<T>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let columns: Vec<Option<Vec<Option<f64>>>> = T::COLUMNS
            .iter()
            .map(|col| match schema.index_of(col.name) {
                Ok(idx) => extract_f64_column(batch.column(idx))
                    .with_context(|| format!("failed to read '{}'", col.name))
                    .map(Some),
                Err(_) if col.required => bail!("Parquet file missing '{}' column", col.name),
                Err(_) => Ok(None),
            })
            .collect::<Result<_>>()?;

        for row in 0..batch.num_rows() {
            let cells: Vec<Option<f64>> = T::COLUMNS
                .iter()
                .zip(&columns)
                .map(|(col, values)| {
                    let cell = values.as_ref().and_then(|v| v[row]);
                    if col.required {
                        Some(cell.unwrap_or(f64::NAN))
                    } else {
                        cell
                    }
                })
                .collect();
            records.push(T::from_row(&cells));
        }
    }

    Ok(records)
}

/// Read a numeric Arrow column into `Option<f64>` cells (None for nulls).
fn extract_f64_column(col: &Arc<dyn Array>) -> Result<Vec<Option<f64>>> {
    let values: Vec<Option<f64>> = match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .context("expected Float64Array")?
            .iter()
            .collect(),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .context("expected Float32Array")?
            .iter()
            .map(|v| v.map(f64::from))
            .collect(),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .context("expected Int64Array")?
            .iter()
            .map(|v| v.map(|i| i as f64))
            .collect(),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .context("expected Int32Array")?
            .iter()
            .map(|v| v.map(f64::from))
            .collect(),
        other => bail!("Expected a numeric column, got {other:?}"),
    };
    Ok(values)
}
