use std::fs::File;
use std::path::{Path, PathBuf};

use arrow::array::Array;
use arrow::error::ArrowError;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::errors::ParquetError;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{
    BIKE_TYPE_COLUMN, BRAND_COLUMN, Dataset, Listing, PRICE_COLUMN, TYPED_COLUMNS, YEAR_COLUMN,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a dataset could not be loaded. Fatal for the session.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed Parquet: {0}")]
    Parquet(#[from] ParquetError),
    #[error("malformed Arrow data: {0}")]
    Arrow(#[from] ArrowError),
    #[error("required column '{0}' not found")]
    MissingColumn(String),
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
    #[error("{0}")]
    Malformed(String),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a listings dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with `Brand`, `Bike Type`, `Year`, `Price` (default)
/// * `.json`    – `[{ "Brand": ..., "Bike Type": ..., "Year": ..., "Price": ..., ... }, ...]`
/// * `.parquet` – columns of the same names, any other columns pass through
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("csv")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Column layout shared by the tabular loaders
// ---------------------------------------------------------------------------

/// Positions of the typed columns plus the pass-through ones within a header.
struct ColumnLayout {
    brand: usize,
    bike_type: usize,
    year: usize,
    price: usize,
    extra: Vec<(usize, String)>,
}

impl ColumnLayout {
    fn from_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> Result<Self, LoadError> {
        let headers: Vec<&str> = headers.into_iter().map(str::trim).collect();
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| *h == name)
                .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
        };

        let extra = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !TYPED_COLUMNS.contains(*h))
            .map(|(i, h)| (i, h.to_string()))
            .collect();

        Ok(Self {
            brand: find(BRAND_COLUMN)?,
            bike_type: find(BIKE_TYPE_COLUMN)?,
            year: find(YEAR_COLUMN)?,
            price: find(PRICE_COLUMN)?,
            extra,
        })
    }

    fn extra_names(&self) -> Vec<String> {
        self.extra.iter().map(|(_, name)| name.clone()).collect()
    }

    /// Build a listing from a row accessor returning `None` for null cells.
    fn listing<'a>(&self, cell: impl Fn(usize) -> Option<&'a str>) -> Listing {
        Listing {
            brand: cell(self.brand).and_then(parse_category),
            bike_type: cell(self.bike_type).and_then(parse_category),
            year: cell(self.year).and_then(parse_year),
            price: cell(self.price).and_then(parse_price),
            extra: self
                .extra
                .iter()
                .map(|(i, _)| cell(*i).unwrap_or("").to_string())
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Cell parsing (fails soft: anything unreadable becomes None)
// ---------------------------------------------------------------------------

fn parse_category(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Accepts `2015` as well as pandas-style `2015.0`.
fn parse_year(s: &str) -> Option<i32> {
    let s = s.trim();
    if let Ok(year) = s.parse::<i32>() {
        return Some(year);
    }
    let f = s.parse::<f64>().ok()?;
    (f.is_finite() && f.fract() == 0.0 && f.abs() <= i32::MAX as f64).then_some(f as i32)
}

/// Accepts thousands separators, e.g. `1,250,000`.
fn parse_price(s: &str) -> Option<f64> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|p| p.is_finite())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(open(path)?);

    let layout = ColumnLayout::from_headers(reader.headers()?.iter())?;
    let mut listings = Vec::new();

    for result in reader.records() {
        let record = result?;
        listings.push(layout.listing(|i| record.get(i)));
    }

    Ok(Dataset::new(listings, layout.extra_names(), path.to_path_buf()))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Brand": "Honda", "Bike Type": "Scooter", "Year": 2015, "Price": 300000, "Location": "Colombo" },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset, LoadError> {
    let root: JsonValue = serde_json::from_reader(std::io::BufReader::new(open(path)?))?;

    let records = root
        .as_array()
        .ok_or_else(|| LoadError::Malformed("expected top-level JSON array".into()))?;

    // Pass-through columns in order of first appearance.
    let mut extra_columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::Malformed(format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !TYPED_COLUMNS.contains(&key.as_str()) && !extra_columns.contains(key) {
                extra_columns.push(key.clone());
            }
        }
    }

    // A column exists when any record carries it; an empty array has none.
    for name in TYPED_COLUMNS {
        let present = records
            .iter()
            .filter_map(JsonValue::as_object)
            .any(|obj| obj.contains_key(name));
        if !present {
            return Err(LoadError::MissingColumn(name.to_string()));
        }
    }

    let listings = records
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|obj| {
            let cell = |name: &str| obj.get(name).and_then(json_to_text);
            Listing {
                brand: cell(BRAND_COLUMN).as_deref().and_then(parse_category),
                bike_type: cell(BIKE_TYPE_COLUMN).as_deref().and_then(parse_category),
                year: cell(YEAR_COLUMN).as_deref().and_then(parse_year),
                price: cell(PRICE_COLUMN).as_deref().and_then(parse_price),
                extra: extra_columns
                    .iter()
                    .map(|name| cell(name.as_str()).unwrap_or_default())
                    .collect(),
            }
        })
        .collect();

    Ok(Dataset::new(listings, extra_columns, path.to_path_buf()))
}

fn json_to_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing listings.
///
/// Typed columns may use any Arrow type that renders to a parseable value
/// (e.g. `Year` as Int64 or Float64, `Price` as Int64 or Float64). Works with
/// files written by both **Pandas** (`df.to_parquet()`) and **Polars**.
fn load_parquet(path: &Path) -> Result<Dataset, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;

    let layout = ColumnLayout::from_headers(schema.fields().iter().map(|f| f.name().as_str()))?;
    let mut listings = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;

        for row in 0..batch.num_rows() {
            let mut cells: Vec<Option<String>> = Vec::with_capacity(batch.num_columns());
            for col in batch.columns() {
                cells.push(if col.is_null(row) {
                    None
                } else {
                    Some(array_value_to_string(col.as_ref(), row)?)
                });
            }
            listings.push(layout.listing(|i| cells.get(i).and_then(|c| c.as_deref())));
        }
    }

    Ok(Dataset::new(listings, layout.extra_names(), path.to_path_buf()))
}
