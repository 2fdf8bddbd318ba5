use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{
    Array, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray, StringArray,
    StringViewArray, UInt32Array, UInt64Array,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{TrackRow, TrackTable};

const ARTIST_NAME: &str = "artist_name";
const PLAYLIST_NAME: &str = "name";
const TRACK_NAME: &str = "track_name";
const RELEASE_YEAR: &str = "release_year";
const TRACK_DURATION: &str = "track_duration_m";
const NUM_FOLLOWERS: &str = "num_followers";

/// Columns every input file must provide, in [`TrackRow`] field order.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    ARTIST_NAME,
    PLAYLIST_NAME,
    TRACK_NAME,
    RELEASE_YEAR,
    TRACK_DURATION,
    NUM_FOLLOWERS,
];

// ---------------------------------------------------------------------------
// Schema errors
// ---------------------------------------------------------------------------

/// Problems with the shape or content of an input file.
#[derive(Debug, Error, PartialEq)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("column '{column}' has unsupported type {data_type}")]
    UnsupportedColumnType {
        column: &'static str,
        data_type: String,
    },

    #[error("row {row}: '{column}' value {value:?} is not a valid {expected}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
        expected: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a track table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row naming at least the required columns
/// * `.json`    – `[{ "artist_name": ..., "name": ..., ... }, ...]`
/// * `.parquet` – one column per field
pub fn load_file(path: &Path) -> Result<TrackTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} rows ({} artists, {} playlists) from {}",
        table.len(),
        table.artists().len(),
        table.playlists().len(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<TrackTable> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    read_csv(file)
}

/// Parse CSV text with a header row. Extra columns are ignored.
pub fn read_csv<R: Read>(input: R) -> Result<TrackTable> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let mut indices = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, column) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.trim() == column)
            .ok_or(LoadError::MissingColumn(column))?;
    }
    let [artist, playlist, track, year, duration, followers] = indices;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let field = |idx: usize| record.get(idx).unwrap_or("");

        rows.push(TrackRow {
            artist_name: field(artist).to_string(),
            name: field(playlist).to_string(),
            track_name: field(track).to_string(),
            release_year: parse_year(field(year), row_no)?,
            track_duration_m: parse_duration(field(duration), row_no)?,
            num_followers: parse_followers(field(followers), row_no)?,
        });
    }

    Ok(TrackTable::from_rows(rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<TrackTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

/// Records-oriented JSON, as written by `df.to_json(orient='records')`:
///
/// ```json
/// [
///   {
///     "artist_name": "Drake",
///     "name": "Throwbacks",
///     "track_name": "Hold On, We're Going Home",
///     "release_year": 2013,
///     "track_duration_m": 3.79,
///     "num_followers": 1
///   },
///   ...
/// ]
/// ```
pub fn parse_json(text: &str) -> Result<TrackTable> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let field = |column: &'static str| -> Result<String, LoadError> {
            let value = obj.get(column).ok_or(LoadError::MissingColumn(column))?;
            json_scalar_text(value).ok_or_else(|| LoadError::InvalidValue {
                row: i,
                column,
                value: value.to_string(),
                expected: "scalar",
            })
        };

        rows.push(TrackRow {
            artist_name: field(ARTIST_NAME)?,
            name: field(PLAYLIST_NAME)?,
            track_name: field(TRACK_NAME)?,
            release_year: parse_year(&field(RELEASE_YEAR)?, i)?,
            track_duration_m: parse_duration(&field(TRACK_DURATION)?, i)?,
            num_followers: parse_followers(&field(NUM_FOLLOWERS)?, i)?,
        });
    }

    Ok(TrackTable::from_rows(rows))
}

fn json_scalar_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding one column per [`TrackRow`] field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`, which stores strings as `Utf8View`);
/// integer columns that Pandas widened to floats are accepted as long as every
/// value is integral.
fn load_parquet(path: &Path) -> Result<TrackTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let column = |name: &'static str| {
            schema
                .index_of(name)
                .map(|idx| batch.column(idx))
                .map_err(|_| LoadError::MissingColumn(name))
        };
        let artist = column(ARTIST_NAME)?;
        let playlist = column(PLAYLIST_NAME)?;
        let track = column(TRACK_NAME)?;
        let year = column(RELEASE_YEAR)?;
        let duration = column(TRACK_DURATION)?;
        let followers = column(NUM_FOLLOWERS)?;

        for i in 0..batch.num_rows() {
            let row_no = rows.len();
            let year_value = cell_int(year, i, row_no, RELEASE_YEAR)?;
            let followers_value = cell_int(followers, i, row_no, NUM_FOLLOWERS)?;

            rows.push(TrackRow {
                artist_name: cell_text(artist, i, row_no, ARTIST_NAME)?,
                name: cell_text(playlist, i, row_no, PLAYLIST_NAME)?,
                track_name: cell_text(track, i, row_no, TRACK_NAME)?,
                release_year: i32::try_from(year_value)
                    .map_err(|_| invalid(row_no, RELEASE_YEAR, year_value, "year"))?,
                track_duration_m: cell_float(duration, i, row_no, TRACK_DURATION)?,
                num_followers: u64::try_from(followers_value)
                    .map_err(|_| invalid(row_no, NUM_FOLLOWERS, followers_value, "count"))?,
            });
        }
    }

    Ok(TrackTable::from_rows(rows))
}

// -- Parquet / Arrow helpers --

fn downcast<'a, T: 'static>(col: &'a Arc<dyn Array>, column: &'static str) -> Result<&'a T> {
    col.as_any()
        .downcast_ref::<T>()
        .with_context(|| format!("column '{column}' does not match its declared type"))
}

fn unsupported(col: &Arc<dyn Array>, column: &'static str) -> LoadError {
    LoadError::UnsupportedColumnType {
        column,
        data_type: format!("{:?}", col.data_type()),
    }
}

fn null_cell(col: &Arc<dyn Array>, i: usize, row_no: usize, column: &'static str) -> Result<()> {
    if col.is_null(i) {
        return Err(invalid(row_no, column, "null", "non-null value").into());
    }
    Ok(())
}

fn cell_text(col: &Arc<dyn Array>, i: usize, row_no: usize, column: &'static str) -> Result<String> {
    null_cell(col, i, row_no, column)?;
    let text = match col.data_type() {
        DataType::Utf8 => downcast::<StringArray>(col, column)?.value(i).to_string(),
        DataType::LargeUtf8 => downcast::<LargeStringArray>(col, column)?.value(i).to_string(),
        DataType::Utf8View => downcast::<StringViewArray>(col, column)?.value(i).to_string(),
        _ => return Err(unsupported(col, column).into()),
    };
    Ok(text)
}

fn cell_int(col: &Arc<dyn Array>, i: usize, row_no: usize, column: &'static str) -> Result<i64> {
    null_cell(col, i, row_no, column)?;
    let value = match col.data_type() {
        DataType::Int32 => downcast::<Int32Array>(col, column)?.value(i) as i64,
        DataType::Int64 => downcast::<Int64Array>(col, column)?.value(i),
        DataType::UInt32 => downcast::<UInt32Array>(col, column)?.value(i) as i64,
        DataType::UInt64 => {
            let v = downcast::<UInt64Array>(col, column)?.value(i);
            i64::try_from(v).map_err(|_| invalid(row_no, column, v, "integer"))?
        }
        DataType::Float64 => {
            let v = downcast::<Float64Array>(col, column)?.value(i);
            integral_float(v).ok_or_else(|| invalid(row_no, column, v, "integer"))?
        }
        _ => return Err(unsupported(col, column).into()),
    };
    Ok(value)
}

fn cell_float(col: &Arc<dyn Array>, i: usize, row_no: usize, column: &'static str) -> Result<f64> {
    null_cell(col, i, row_no, column)?;
    let value = match col.data_type() {
        DataType::Float64 => downcast::<Float64Array>(col, column)?.value(i),
        DataType::Float32 => downcast::<Float32Array>(col, column)?.value(i) as f64,
        DataType::Int32 => downcast::<Int32Array>(col, column)?.value(i) as f64,
        DataType::Int64 => downcast::<Int64Array>(col, column)?.value(i) as f64,
        _ => return Err(unsupported(col, column).into()),
    };
    if !value.is_finite() {
        return Err(invalid(row_no, column, value, "duration").into());
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// Value parsing shared by the text formats
// ---------------------------------------------------------------------------

fn invalid(row: usize, column: &'static str, value: impl ToString, expected: &'static str) -> LoadError {
    LoadError::InvalidValue {
        row,
        column,
        value: value.to_string(),
        expected,
    }
}

/// `2015` and `2015.0` are both integral; `2015.5` is not.
fn parse_integral(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(i) = s.parse::<i64>() {
        return Some(i);
    }
    s.parse::<f64>().ok().and_then(integral_float)
}

fn integral_float(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn parse_year(s: &str, row: usize) -> Result<i32, LoadError> {
    parse_integral(s)
        .and_then(|y| i32::try_from(y).ok())
        .ok_or_else(|| invalid(row, RELEASE_YEAR, s, "year"))
}

fn parse_followers(s: &str, row: usize) -> Result<u64, LoadError> {
    parse_integral(s)
        .and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| invalid(row, NUM_FOLLOWERS, s, "count"))
}

fn parse_duration(s: &str, row: usize) -> Result<f64, LoadError> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite())
        .ok_or_else(|| invalid(row, TRACK_DURATION, s, "duration"))
}
