use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray, StringArray};
use arrow::datatypes::DataType;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::InputError;

use super::model::{AppDataset, RawAppRecord};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and normalize an app dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – `[{ "App": "...", "Category": "...", ... }, ...]`
/// * `.csv`     – header row with the Play Store column names
/// * `.parquet` – one column per field, string or numeric
pub fn load_file(path: &Path) -> Result<AppDataset> {
    let raw = load_raw(path)?;
    let dataset = AppDataset::from_raw(&raw)?;
    log::info!(
        "Loaded {} apps from {} ({} categories, {} genres)",
        dataset.len(),
        path.display(),
        dataset.categories.len(),
        dataset.genres.len()
    );
    Ok(dataset)
}

/// Read rows without normalizing them.
pub fn load_raw(path: &Path) -> Result<Vec<RawAppRecord>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (the bundled `data.json`):
///
/// ```json
/// [
///   {
///     "App": "Photo Editor & Candy Camera",
///     "Category": "ART_AND_DESIGN",
///     "Rating": "4.1",
///     "Reviews": "159",
///     "Size": "19M",
///     "Installs": "10,000+",
///     "Type": "Free",
///     "ContentRating": "Everyone",
///     "Genres": "Art & Design",
///     "Last Updated": "January 7, 2018"
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<RawAppRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

/// Parse a JSON document holding an array of app rows.
///
/// Array elements that are not objects are skipped with a warning.
pub fn parse_json(text: &str) -> Result<Vec<RawAppRecord>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = match &root {
        JsonValue::Array(records) => records,
        other => return Err(InputError::NotAnArray(json_kind(other).to_string()).into()),
    };

    let mut raw = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        if !rec.is_object() {
            log::warn!("Row {i}: expected an object, found {}; skipped", json_kind(rec));
            continue;
        }
        let row = RawAppRecord::deserialize(rec).with_context(|| format!("Row {i}"))?;
        raw.push(row);
    }
    Ok(raw)
}

fn json_kind(val: &JsonValue) -> &'static str {
    match val {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with the Play Store column names
/// (`App,Category,Rating,Reviews,Size,Installs,Type,...`).
/// Unknown columns are ignored, missing ones read as empty.
fn load_csv(path: &Path) -> Result<Vec<RawAppRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;

    let mut raw = Vec::new();
    for (row_no, result) in reader.deserialize::<RawAppRecord>().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        raw.push(record);
    }
    Ok(raw)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Column names recognised in Parquet files, with the field they fill.
const PARQUET_COLUMNS: &[(&str, Field)] = &[
    ("App", Field::App),
    ("Category", Field::Category),
    ("Rating", Field::Rating),
    ("Reviews", Field::Reviews),
    ("Size", Field::Size),
    ("Installs", Field::Installs),
    ("Type", Field::Type),
    ("ContentRating", Field::ContentRating),
    ("Content Rating", Field::ContentRating),
    ("Genres", Field::Genres),
    ("Last Updated", Field::LastUpdated),
    ("LastUpdated", Field::LastUpdated),
];

#[derive(Debug, Clone, Copy)]
enum Field {
    App,
    Category,
    Rating,
    Reviews,
    Size,
    Installs,
    Type,
    ContentRating,
    Genres,
    LastUpdated,
}

impl Field {
    fn slot(self, rec: &mut RawAppRecord) -> &mut Option<String> {
        match self {
            Field::App => &mut rec.app,
            Field::Category => &mut rec.category,
            Field::Rating => &mut rec.rating,
            Field::Reviews => &mut rec.reviews,
            Field::Size => &mut rec.size,
            Field::Installs => &mut rec.installs,
            Field::Type => &mut rec.app_type,
            Field::ContentRating => &mut rec.content_rating,
            Field::Genres => &mut rec.genres,
            Field::LastUpdated => &mut rec.last_updated,
        }
    }
}

/// Load a Parquet file with one column per Play Store field.
///
/// Works with files written by **Pandas** (`df.to_parquet()`), **Polars**
/// (`df.write_parquet()`) and the `generate_sample` binary.
fn load_parquet(path: &Path) -> Result<Vec<RawAppRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut raw = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let columns: Vec<(usize, Field)> = PARQUET_COLUMNS
            .iter()
            .filter_map(|(name, field)| schema.index_of(name).ok().map(|i| (i, *field)))
            .collect();
        if columns.is_empty() {
            bail!("Parquet file has none of the expected columns (App, Category, ...)");
        }

        for row in 0..batch.num_rows() {
            let mut rec = RawAppRecord::default();
            for (col_idx, field) in &columns {
                *field.slot(&mut rec) = extract_text(batch.column(*col_idx), row);
            }
            raw.push(rec);
        }
    }

    Ok(raw)
}

/// Extract a single cell as text from an Arrow column.
fn extract_text(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|s| s.value(row).to_string()),
        DataType::LargeUtf8 => Some(col.as_string::<i64>().value(row).to_string()),
        _ => array_value_to_string(col.as_ref(), row).ok(),
    }
}
