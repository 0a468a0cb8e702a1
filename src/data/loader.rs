use std::fs::File;
use std::path::Path;

use arrow::array::{
    Array, ArrayRef, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    LargeStringArray, StringArray, StringViewArray,
};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{CellValue, Listing, ListingTable};

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Columns every source must provide, in the order [`Row`] stores them.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "name",
    "neighbourhood_group",
    "neighbourhood",
    "room_type",
    "price",
    "number_of_reviews",
    "reviews_per_month",
    "calculated_host_listings_count",
];

const NAME: usize = 0;
const NEIGHBOURHOOD_GROUP: usize = 1;
const NEIGHBOURHOOD: usize = 2;
const ROOM_TYPE: usize = 3;
const PRICE: usize = 4;
const NUMBER_OF_REVIEWS: usize = 5;
const REVIEWS_PER_MONTH: usize = 6;
const HOST_LISTINGS_COUNT: usize = 7;

/// The required cells of one source row.
type Row = [CellValue; REQUIRED_COLUMNS.len()];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a listings table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with at least the [`REQUIRED_COLUMNS`]
/// * `.json`    – `[{ "name": ..., "price": ..., ... }, ...]`
/// * `.parquet` – one Arrow column per required field
///
/// Extra columns are ignored. Missing categories are normalized to
/// `"Unknown"` by [`ListingTable::from_listings`].
pub fn load_file(path: &Path) -> Result<ListingTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let listings = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    let table = ListingTable::from_listings(listings);
    if table.is_empty() {
        log::warn!("{} contains no listings", path.display());
    }
    log::info!(
        "Loaded {} listings from {} ({} neighbourhood groups, {} room types)",
        table.len(),
        path.display(),
        table.neighbourhood_groups().len(),
        table.room_types().len()
    );
    Ok(table)
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Row conversion shared by all formats
// ---------------------------------------------------------------------------

fn listing_from_row(row_no: usize, row: Row) -> Result<Listing, LoadError> {
    let invalid = |column: usize, cell: &CellValue| LoadError::InvalidValue {
        row: row_no + 1,
        column: REQUIRED_COLUMNS[column],
        value: cell.to_string(),
    };

    let price = row[PRICE]
        .as_f64()
        .filter(|p| p.is_finite() && *p >= 0.0)
        .ok_or_else(|| invalid(PRICE, &row[PRICE]))?;

    let number_of_reviews = parse_count(&row[NUMBER_OF_REVIEWS])
        .ok_or_else(|| invalid(NUMBER_OF_REVIEWS, &row[NUMBER_OF_REVIEWS]))?;

    let calculated_host_listings_count = parse_count(&row[HOST_LISTINGS_COUNT])
        .ok_or_else(|| invalid(HOST_LISTINGS_COUNT, &row[HOST_LISTINGS_COUNT]))?;

    let reviews_per_month = if row[REVIEWS_PER_MONTH].is_missing() {
        None
    } else {
        let rate = row[REVIEWS_PER_MONTH]
            .as_f64()
            .filter(|r| r.is_finite() && *r >= 0.0)
            .ok_or_else(|| invalid(REVIEWS_PER_MONTH, &row[REVIEWS_PER_MONTH]))?;
        Some(rate)
    };

    let text = |column: usize| row[column].as_text().unwrap_or_default();

    Ok(Listing {
        name: text(NAME),
        neighbourhood_group: text(NEIGHBOURHOOD_GROUP),
        neighbourhood: text(NEIGHBOURHOOD),
        room_type: text(ROOM_TYPE),
        price,
        number_of_reviews,
        reviews_per_month,
        calculated_host_listings_count,
    })
}

/// Non-negative whole number; integral floats such as `5.0` are accepted.
fn parse_count(cell: &CellValue) -> Option<u64> {
    match cell {
        CellValue::Integer(i) => u64::try_from(*i).ok(),
        CellValue::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral_count))
        }
        CellValue::Float(f) => integral_count(*f),
        _ => None,
    }
}

fn integral_count(f: f64) -> Option<u64> {
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0).then_some(f as u64)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one listing per record.
/// Empty fields are missing values.
fn load_csv(path: &Path) -> Result<Vec<Listing>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(open(path)?);

    let headers = reader.headers()?.clone();
    let mut positions = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, column) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.trim() == column)
            .ok_or(LoadError::MissingColumn(column))?;
    }

    let mut listings = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let row: Row = positions.map(|idx| match record.get(idx) {
            Some(value) if !value.is_empty() => CellValue::String(value.to_string()),
            _ => CellValue::Null,
        });
        listings.push(listing_from_row(row_no, row)?);
    }

    Ok(listings)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, as written by
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "name": "Sunny loft", "neighbourhood_group": "Centro", "price": 85, ... },
///   ...
/// ]
/// ```
///
/// `null` or an absent key is a missing value; a required key that appears
/// in no record at all is a missing column.
fn load_json(path: &Path) -> Result<Vec<Listing>, LoadError> {
    let root: JsonValue = serde_json::from_reader(std::io::BufReader::new(open(path)?))?;
    let records = root.as_array().ok_or(LoadError::NotAnArray)?;

    let objects = records
        .iter()
        .enumerate()
        .map(|(i, rec)| rec.as_object().ok_or(LoadError::NotAnObject { row: i + 1 }))
        .collect::<Result<Vec<_>, _>>()?;

    if !objects.is_empty() {
        for column in REQUIRED_COLUMNS {
            if !objects.iter().any(|obj| obj.contains_key(column)) {
                return Err(LoadError::MissingColumn(column));
            }
        }
    }

    objects
        .into_iter()
        .enumerate()
        .map(|(row_no, obj)| {
            let row: Row = REQUIRED_COLUMNS.map(|column| {
                obj.get(column).map_or(CellValue::Null, json_to_cell)
            });
            listing_from_row(row_no, row)
        })
        .collect()
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per required field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); nulls are missing values.
fn load_parquet(path: &Path) -> Result<Vec<Listing>, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;

    let schema = builder.schema().clone();
    let mut positions = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, column) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = schema
            .index_of(column)
            .map_err(|_| LoadError::MissingColumn(column))?;
    }

    let reader = builder.build()?;
    let mut listings = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let mut columns: Vec<ArrayRef> = Vec::with_capacity(REQUIRED_COLUMNS.len());
        for (idx, column) in positions.into_iter().zip(REQUIRED_COLUMNS) {
            columns.push(decode_column(column, batch.column(idx))?);
        }

        for row in 0..batch.num_rows() {
            let mut cells: Row = std::array::from_fn(|_| CellValue::Null);
            for (i, cell) in cells.iter_mut().enumerate() {
                *cell = extract_cell(&columns[i], row)
                    .ok_or_else(|| unsupported(REQUIRED_COLUMNS[i], &columns[i]))?;
            }
            listings.push(listing_from_row(listings.len(), cells)?);
        }
    }

    Ok(listings)
}

fn unsupported(column: &'static str, col: &ArrayRef) -> LoadError {
    LoadError::UnsupportedColumnType {
        column,
        data_type: col.data_type().to_string(),
    }
}

/// Unpack dictionary-encoded columns (pandas categoricals) to their value
/// type and reject anything [`extract_cell`] cannot read.
fn decode_column(column: &'static str, col: &ArrayRef) -> Result<ArrayRef, LoadError> {
    let decoded = match col.data_type() {
        DataType::Dictionary(_, value_type) => cast(col, value_type)?,
        _ => col.clone(),
    };
    match decoded.data_type() {
        DataType::Utf8
        | DataType::LargeUtf8
        | DataType::Utf8View
        | DataType::Int32
        | DataType::Int64
        | DataType::Float32
        | DataType::Float64
        | DataType::Boolean => Ok(decoded),
        _ => Err(unsupported(column, &decoded)),
    }
}

/// Extract a single cell from an Arrow column at a given row, or `None` for
/// an unsupported type.
fn extract_cell(col: &ArrayRef, row: usize) -> Option<CellValue> {
    if col.is_null(row) {
        return Some(CellValue::Null);
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .map(|a| CellValue::String(a.value(row).to_string())),
        DataType::LargeUtf8 => any
            .downcast_ref::<LargeStringArray>()
            .map(|a| CellValue::String(a.value(row).to_string())),
        DataType::Utf8View => any
            .downcast_ref::<StringViewArray>()
            .map(|a| CellValue::String(a.value(row).to_string())),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| CellValue::Integer(a.value(row) as i64)),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| CellValue::Integer(a.value(row))),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| CellValue::Float(a.value(row) as f64)),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map(|a| CellValue::Float(a.value(row))),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map(|a| CellValue::Bool(a.value(row))),
        _ => None,
    }
}
