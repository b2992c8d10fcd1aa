use std::path::Path;

use anyhow::{anyhow, Context, Result};
use arrow::array::timezone::Tz;
use arrow::array::{Array, ArrayRef, AsArray, Float64Array, PrimitiveArray, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{
    ArrowTimestampType, DataType, Float64Type, TimeUnit, TimestampMicrosecondType,
    TimestampMillisecondType, TimestampNanosecondType, TimestampSecondType,
};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDateTime;
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::filter;
use super::model::{FilterCriteria, Trip, TripDataset};
use crate::config::Config;
use crate::error::BikeshareError;

pub const START_TIME: &str = "Start Time";
pub const END_TIME: &str = "End Time";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

const REQUIRED_COLUMNS: [&str; 6] = [
    START_TIME,
    END_TIME,
    TRIP_DURATION,
    START_STATION,
    END_STATION,
    USER_TYPE,
];

/// Accepted timestamp layouts; `%.f` makes fractional seconds optional.
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the trips for `criteria.city` and apply its month/day filters.
///
/// The city's data source comes from `config`; a city without one fails
/// immediately rather than producing an absent dataset.
pub fn load(config: &Config, criteria: &FilterCriteria) -> Result<TripDataset> {
    let path = config.source_for(criteria.city)?;
    if !path.is_file() {
        return Err(BikeshareError::MissingFile {
            path: path.to_path_buf(),
        }
        .into());
    }

    info!("Loading {} trips from {}", criteria.city, path.display());
    let trips = load_file(path).with_context(|| format!("loading {}", path.display()))?;

    let mut dataset = TripDataset::from_trips(criteria.city, trips);
    let total = dataset.len();
    filter::apply(&mut dataset, criteria.month, criteria.day);
    info!(
        "{} of {total} trips match month={} day={}",
        dataset.len(),
        criteria.month,
        criteria.day
    );
    Ok(dataset)
}

/// Load raw trips from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the column names above (recommended)
/// * `.json`    – `[{ "Start Time": "...", "Trip Duration": 660, ... }, ...]`
/// * `.parquet` – string or timestamp time columns, numeric duration
pub fn load_file(path: &Path) -> Result<Vec<Trip>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let trips = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(BikeshareError::UnsupportedFormat(other.to_string()).into()),
    };
    debug!("Read {} rows from {}", trips.len(), path.display());
    Ok(trips)
}

/// Parse a start/end time cell.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

// ---------------------------------------------------------------------------
// Row shape shared by the CSV and JSON loaders
// ---------------------------------------------------------------------------

/// Columns not listed here (e.g. an unnamed index column) are ignored.
#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time")]
    end_time: String,
    #[serde(rename = "Trip Duration")]
    trip_duration: f64,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "User Type", default)]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    /// Often stored as a float (`1992.0`) because of missing values.
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<f64>,
}

impl RawTrip {
    fn into_trip(self, row: usize) -> Result<Trip, BikeshareError> {
        Ok(Trip {
            start_time: timestamp_at(row, &self.start_time)?,
            end_time: timestamp_at(row, &self.end_time)?,
            trip_duration: self.trip_duration,
            start_station: self.start_station,
            end_station: self.end_station,
            user_type: non_empty(self.user_type),
            gender: non_empty(self.gender),
            birth_year: year_from_f64(self.birth_year),
        })
    }
}

fn timestamp_at(row: usize, value: &str) -> Result<NaiveDateTime, BikeshareError> {
    parse_timestamp(value).ok_or_else(|| BikeshareError::InvalidTimestamp {
        row,
        value: value.to_string(),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn year_from_f64(value: Option<f64>) -> Option<i64> {
    value.filter(|y| y.is_finite()).map(|y| y as i64)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<Trip>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(BikeshareError::MissingColumn(col.to_string()).into());
        }
    }

    let mut trips = Vec::new();
    for (row_no, result) in reader.deserialize::<RawTrip>().enumerate() {
        let raw = result.with_context(|| format!("CSV row {row_no}"))?;
        trips.push(raw.into_trip(row_no)?);
    }
    Ok(trips)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented array, the default `df.to_json(orient='records')`.
///
/// Every record must carry the required keys; an explicit `null` counts as a
/// missing value, an absent key as a missing column.
fn load_json(path: &Path) -> Result<Vec<Trip>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;
    for (row_no, rec) in rows.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {row_no} is not a JSON object"))?;
        if let Some(col) = REQUIRED_COLUMNS.into_iter().find(|c| !obj.contains_key(*c)) {
            return Err(BikeshareError::MissingColumn(col.to_string()).into());
        }
    }

    let records: Vec<RawTrip> = serde_json::from_value(root).context("decoding JSON records")?;

    records
        .into_iter()
        .enumerate()
        .map(|(row_no, raw)| raw.into_trip(row_no).map_err(Into::into))
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Time columns are read natively when stored as timestamps; every other
/// column is cast to Utf8 or Float64 first, so the loader accepts whatever
/// Pandas or Polars wrote (ints, floats, strings, string-typed times).
fn load_parquet(path: &Path) -> Result<Vec<Trip>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut trips = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let starts = time_column(&batch, START_TIME, trips.len())?;
        let ends = time_column(&batch, END_TIME, trips.len())?;
        let duration = required(&batch, TRIP_DURATION, &DataType::Float64)?;
        let from = required(&batch, START_STATION, &DataType::Utf8)?;
        let to = required(&batch, END_STATION, &DataType::Utf8)?;
        let user_type = required(&batch, USER_TYPE, &DataType::Utf8)?;
        let gender = optional(&batch, GENDER, &DataType::Utf8)?;
        let birth_year = optional(&batch, BIRTH_YEAR, &DataType::Float64)?;

        let duration = duration.as_primitive::<Float64Type>();
        let from = from.as_string::<i32>();
        let to = to.as_string::<i32>();
        let user_type = user_type.as_string::<i32>();
        let gender = gender.as_ref().map(|a| a.as_string::<i32>());
        let birth_year = birth_year.as_ref().map(|a| a.as_primitive::<Float64Type>());

        for row in 0..batch.num_rows() {
            let row_no = trips.len();
            trips.push(Trip {
                start_time: starts[row],
                end_time: ends[row],
                trip_duration: f64_at(duration, row)
                    .ok_or_else(|| anyhow!("Row {row_no}: missing '{TRIP_DURATION}'"))?,
                start_station: str_at(from, row).unwrap_or_default().to_string(),
                end_station: str_at(to, row).unwrap_or_default().to_string(),
                user_type: non_empty(str_at(user_type, row).map(str::to_string)),
                gender: non_empty(gender.and_then(|g| str_at(g, row)).map(str::to_string)),
                birth_year: year_from_f64(birth_year.and_then(|b| f64_at(b, row))),
            });
        }
    }

    Ok(trips)
}

// -- Parquet / Arrow helpers --

fn required(batch: &RecordBatch, name: &str, to: &DataType) -> Result<ArrayRef> {
    optional(batch, name, to)?.ok_or_else(|| BikeshareError::MissingColumn(name.to_string()).into())
}

fn optional(batch: &RecordBatch, name: &str, to: &DataType) -> Result<Option<ArrayRef>> {
    batch
        .column_by_name(name)
        .map(|col| cast(col, to).with_context(|| format!("casting column '{name}' to {to:?}")))
        .transpose()
}

/// Wall-clock times of a start/end column, one per row of `batch`.
///
/// Timestamp columns are converted directly, to local time of their zone when
/// they carry one. Anything else goes through [`parse_timestamp`].
fn time_column(batch: &RecordBatch, name: &str, first_row: usize) -> Result<Vec<NaiveDateTime>> {
    let col = batch
        .column_by_name(name)
        .ok_or_else(|| BikeshareError::MissingColumn(name.to_string()))?;

    let DataType::Timestamp(unit, zone) = col.data_type() else {
        let text = cast(col, &DataType::Utf8)
            .with_context(|| format!("casting column '{name}' to Utf8"))?;
        let text = text.as_string::<i32>();
        return (0..text.len())
            .map(|row| {
                timestamp_at(first_row + row, str_at(text, row).unwrap_or("")).map_err(Into::into)
            })
            .collect();
    };

    let tz: Option<Tz> = zone
        .as_deref()
        .map(str::parse::<Tz>)
        .transpose()
        .with_context(|| format!("column '{name}' has an unknown time zone"))?;

    (0..col.len())
        .map(|row| {
            let value = match unit {
                TimeUnit::Second => wall_clock::<TimestampSecondType>(col, row, tz),
                TimeUnit::Millisecond => wall_clock::<TimestampMillisecondType>(col, row, tz),
                TimeUnit::Microsecond => wall_clock::<TimestampMicrosecondType>(col, row, tz),
                TimeUnit::Nanosecond => wall_clock::<TimestampNanosecondType>(col, row, tz),
            };
            value.ok_or_else(|| {
                BikeshareError::InvalidTimestamp {
                    row: first_row + row,
                    value: "<null>".to_string(),
                }
                .into()
            })
        })
        .collect()
}

fn wall_clock<T: ArrowTimestampType>(
    col: &ArrayRef,
    row: usize,
    tz: Option<Tz>,
) -> Option<NaiveDateTime> {
    let arr: &PrimitiveArray<T> = col.as_primitive::<T>();
    if arr.is_null(row) {
        return None;
    }
    match tz {
        Some(tz) => arr.value_as_datetime_with_tz(row, tz).map(|dt| dt.naive_local()),
        None => arr.value_as_datetime(row),
    }
}

fn str_at(arr: &StringArray, row: usize) -> Option<&str> {
    (!arr.is_null(row)).then(|| arr.value(row))
}

fn f64_at(arr: &Float64Array, row: usize) -> Option<f64> {
    (!arr.is_null(row)).then(|| arr.value(row))
}
