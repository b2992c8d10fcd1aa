use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

use crate::error::BikeshareError;

/// Calendar month names, index 0 = January.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Weekday names, index 0 = Monday.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// The literal accepted in place of a month or weekday name to disable that filter.
pub const ALL: &str = "all";

/// Name of a 1-based month number, `None` when out of range.
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month.checked_sub(1)? as usize).copied()
}

pub fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAY_NAMES[day.num_days_from_monday() as usize]
}

// ---------------------------------------------------------------------------
// City – the fixed set of supported trip-data sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    /// The exact (lower-case) name a user must type.
    pub fn name(self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }

    /// Default data file for this city.
    pub fn default_file_name(self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }

    /// Washington publishes no gender or birth-year columns.
    pub fn has_demographics(self) -> bool {
        !matches!(self, City::Washington)
    }
}

impl FromStr for City {
    type Err = BikeshareError;

    /// Exact match only: no trimming, no case folding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        City::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| BikeshareError::UnknownCity(s.to_string()))
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Month / day filters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthFilter {
    All,
    /// 1-based month number.
    Month(u32),
}

impl FromStr for MonthFilter {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL {
            return Ok(MonthFilter::All);
        }
        MONTH_NAMES
            .iter()
            .position(|m| *m == s)
            .map(|i| MonthFilter::Month(i as u32 + 1))
            .ok_or_else(|| BikeshareError::InvalidChoice {
                kind: "month",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str(ALL),
            MonthFilter::Month(m) => f.write_str(month_name(*m).unwrap_or("?")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayFilter {
    All,
    Day(Weekday),
}

impl FromStr for DayFilter {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL {
            return Ok(DayFilter::All);
        }
        WEEKDAY_NAMES
            .iter()
            .position(|d| *d == s)
            .map(|i| DayFilter::Day(WEEKDAYS[i]))
            .ok_or_else(|| BikeshareError::InvalidChoice {
                kind: "day of week",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => f.write_str(ALL),
            DayFilter::Day(d) => f.write_str(weekday_name(*d)),
        }
    }
}

/// The (city, month, day) selection for one session iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterCriteria {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
}

// ---------------------------------------------------------------------------
// Trip – the source columns of one row
// ---------------------------------------------------------------------------

/// One trip as stored in the source file. Missing cells are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    /// Seconds.
    pub trip_duration: f64,
    pub start_station: String,
    pub end_station: String,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i64>,
}

// ---------------------------------------------------------------------------
// TripRecord – a trip plus its derived calendar fields
// ---------------------------------------------------------------------------

/// A trip tagged with fields derived once from its timestamps.
///
/// Fields are private so the derived values can never drift from the
/// timestamps they were computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    trip: Trip,
    month: u32,
    weekday: Weekday,
    start_hour: u32,
    end_hour: u32,
}

impl From<Trip> for TripRecord {
    fn from(trip: Trip) -> Self {
        TripRecord {
            month: trip.start_time.month(),
            weekday: trip.start_time.weekday(),
            start_hour: trip.start_time.hour(),
            end_hour: trip.end_time.hour(),
            trip,
        }
    }
}

impl TripRecord {
    pub fn trip(&self) -> &Trip {
        &self.trip
    }

    /// 1-based month of the start time.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }
}

// ---------------------------------------------------------------------------
// TripDataset – the loaded rows for one city
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TripDataset {
    pub city: City,
    records: Vec<TripRecord>,
}

impl TripDataset {
    /// Derive calendar fields for every trip, preserving source order.
    pub fn from_trips(city: City, trips: Vec<Trip>) -> Self {
        TripDataset {
            city,
            records: trips.into_iter().map(TripRecord::from).collect(),
        }
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    /// Keep only records matching `keep`; relative order is unchanged.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&TripRecord) -> bool,
    {
        self.records.retain(keep);
    }

    /// Number of trips.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
