use std::fmt;

use super::{mode, most_frequent, or_na, value_counts};
use crate::data::model::TripDataset;

pub const TITLE: &str = "Calculating The Most Popular Stations and Trip...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopularTrip {
    pub from: String,
    pub to: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationStats {
    pub start_station: Option<String>,
    pub end_station: Option<String>,
    pub trip: Option<PopularTrip>,
}

/// Blank station names are missing values: they never win a mode, and a
/// trip missing either end is left out of the pair count.
pub fn compute(dataset: &TripDataset) -> StationStats {
    let trips = || dataset.records().iter().map(|r| r.trip());
    let starts = || trips().map(|t| named(&t.start_station));
    let ends = || trips().map(|t| named(&t.end_station));

    // Group by the ordered (start, end) pair.
    let pairs = value_counts(starts().zip(ends()).filter_map(|(from, to)| from.zip(to)));
    let trip = most_frequent(pairs).map(|((from, to), count)| PopularTrip {
        from: from.to_string(),
        to: to.to_string(),
        count,
    });

    StationStats {
        start_station: mode(starts().flatten()).map(str::to_string),
        end_station: mode(ends().flatten()).map(str::to_string),
        trip,
    }
}

fn named(station: &str) -> Option<&str> {
    (!station.trim().is_empty()).then_some(station)
}

impl fmt::Display for StationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Popular Start Station:\t{}\n", or_na(self.start_station.as_ref()))?;
        writeln!(f, "Popular End Station:\t{}\n", or_na(self.end_station.as_ref()))?;
        match &self.trip {
            Some(t) => writeln!(
                f,
                "The Most Popular Trip was from '{}' to '{}' with {} trips.",
                t.from, t.to, t.count
            ),
            None => writeln!(f, "The Most Popular Trip was: n/a"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{trip, ts};
    use crate::data::model::City;

    fn dataset(pairs: &[(&str, &str)]) -> TripDataset {
        TripDataset::from_trips(
            City::Washington,
            pairs
                .iter()
                .map(|(from, to)| trip(ts(2017, 4, 1, 12, 0), from, to))
                .collect(),
        )
    }

    #[test]
    fn three_row_scenario() {
        let stats = compute(&dataset(&[("X", "Y"), ("X", "Y"), ("Y", "Y")]));
        assert_eq!(stats.start_station.as_deref(), Some("X"));
        assert_eq!(stats.end_station.as_deref(), Some("Y"));
        assert_eq!(
            stats.trip,
            Some(PopularTrip {
                from: "X".to_string(),
                to: "Y".to_string(),
                count: 2
            })
        );
        assert!(stats
            .to_string()
            .contains("The Most Popular Trip was from 'X' to 'Y' with 2 trips."));
    }

    #[test]
    fn pair_direction_matters() {
        let stats = compute(&dataset(&[("A", "B"), ("B", "A"), ("B", "A")]));
        let trip = stats.trip.unwrap();
        assert_eq!((trip.from.as_str(), trip.to.as_str(), trip.count), ("B", "A", 2));
    }

    #[test]
    fn pair_ties_go_to_first_seen() {
        let stats = compute(&dataset(&[("C", "D"), ("A", "B"), ("A", "B"), ("C", "D")]));
        let trip = stats.trip.unwrap();
        assert_eq!((trip.from.as_str(), trip.to.as_str()), ("C", "D"));
    }

    #[test]
    fn blank_stations_are_skipped() {
        let stats = compute(&dataset(&[("", "Y"), ("", "Y"), ("  ", ""), ("X", "Y")]));
        assert_eq!(stats.start_station.as_deref(), Some("X"));
        assert_eq!(stats.end_station.as_deref(), Some("Y"));
        assert_eq!(
            stats.trip,
            Some(PopularTrip {
                from: "X".to_string(),
                to: "Y".to_string(),
                count: 1
            })
        );

        let stats = compute(&dataset(&[("", ""), ("", "")]));
        assert_eq!((stats.start_station, stats.end_station, stats.trip), (None, None, None));
    }

    #[test]
    fn empty_dataset() {
        let stats = compute(&dataset(&[]));
        assert_eq!(stats.trip, None);
        assert!(stats.to_string().contains("Popular Start Station:\tn/a"));
    }
}
