use std::fmt::Display;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray, UInt32Array};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use log::debug;

use crate::data::loader::{
    BIRTH_YEAR, END_STATION, END_TIME, GENDER, START_STATION, START_TIME, TRIP_DURATION,
    USER_TYPE,
};
use crate::data::model::{weekday_name, TripDataset, TripRecord};

/// Closes every section of output.
pub const SEPARATOR: &str = "----------------------------------------";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ---------------------------------------------------------------------------
// Timed report sections
// ---------------------------------------------------------------------------

/// Print `title`, then the computed report, then how long it took.
pub fn timed<W, T, F>(out: &mut W, title: &str, compute: F) -> io::Result<()>
where
    W: Write,
    T: Display,
    F: FnOnce() -> T,
{
    writeln!(out, "\n{title}\n")?;
    let started = Instant::now();

    let report = compute();
    writeln!(out, "{report}")?;

    let elapsed = started.elapsed();
    debug!("{title} {elapsed:?}");
    writeln!(out, "\nThis took {} seconds.", elapsed.as_secs_f64())?;
    writeln!(out, "{SEPARATOR}\n")
}

// ---------------------------------------------------------------------------
// Dataset preview
// ---------------------------------------------------------------------------

/// ASCII table of the first `rows` records, like a DataFrame `head()`.
pub fn preview(dataset: &TripDataset, rows: usize) -> Result<String> {
    if dataset.is_empty() {
        return Ok("No trips match the selected filters.".to_string());
    }

    let head = &dataset.records()[..rows.min(dataset.len())];
    let text = |f: fn(&TripRecord) -> Option<String>| text_column(head, f);

    let mut columns: Vec<(&str, ArrayRef)> = vec![
        (START_TIME, text(|r| Some(r.trip().start_time.format(TIME_FORMAT).to_string()))),
        (END_TIME, text(|r| Some(r.trip().end_time.format(TIME_FORMAT).to_string()))),
        (
            TRIP_DURATION,
            Arc::new(Float64Array::from_iter_values(
                head.iter().map(|r| r.trip().trip_duration),
            )) as ArrayRef,
        ),
        (START_STATION, text(|r| Some(r.trip().start_station.clone()))),
        (END_STATION, text(|r| Some(r.trip().end_station.clone()))),
        (USER_TYPE, text(|r| r.trip().user_type.clone())),
    ];
    if dataset.city.has_demographics() {
        columns.push((GENDER, text(|r| r.trip().gender.clone())));
        columns.push((
            BIRTH_YEAR,
            Arc::new(head.iter().map(|r| r.trip().birth_year).collect::<Int64Array>()) as ArrayRef,
        ));
    }
    columns.push((
        "Month",
        Arc::new(UInt32Array::from_iter_values(head.iter().map(|r| r.month()))) as ArrayRef,
    ));
    columns.push(("Day of Week", text(|r| Some(weekday_name(r.weekday()).to_string()))));

    let batch = RecordBatch::try_from_iter(columns).context("building preview batch")?;
    let table = pretty_format_batches(&[batch]).context("formatting preview")?;
    Ok(table.to_string())
}

fn text_column<F>(head: &[TripRecord], f: F) -> ArrayRef
where
    F: Fn(&TripRecord) -> Option<String>,
{
    Arc::new(head.iter().map(f).collect::<StringArray>())
}
