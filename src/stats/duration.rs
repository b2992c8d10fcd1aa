use std::fmt;

use crate::data::model::TripDataset;

pub const TITLE: &str = "Calculating Trip Duration...";

/// Decimal places kept for the average trip duration.
const MEAN_PLACES: i32 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct DurationStats {
    /// Sum over trips of `end hour - start hour` (hour-of-day fields).
    ///
    /// This is not elapsed time: a trip inside one hour adds 0 and a trip
    /// crossing midnight adds a negative amount. Kept as-is for parity with
    /// the published reports this tool reproduces.
    pub total_travel_hours: i64,
    /// Mean of the `Trip Duration` column in minutes, rounded to 4 places.
    pub mean_minutes: Option<f64>,
}

pub fn compute(dataset: &TripDataset) -> DurationStats {
    let records = dataset.records();

    let total_travel_hours = records
        .iter()
        .map(|r| i64::from(r.end_hour()) - i64::from(r.start_hour()))
        .sum();

    let mean_minutes = (!records.is_empty()).then(|| {
        let seconds: f64 = records.iter().map(|r| r.trip().trip_duration).sum();
        round_to(seconds / records.len() as f64 / 60.0, MEAN_PLACES)
    });

    DurationStats {
        total_travel_hours,
        mean_minutes,
    }
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

impl fmt::Display for DurationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Travel time:\t{} hours\n", self.total_travel_hours)?;
        match self.mean_minutes {
            Some(m) => writeln!(f, "Average Travel time:\t{m:.4} minutes"),
            None => writeln!(f, "Average Travel time:\tn/a"),
        }
    }
}
