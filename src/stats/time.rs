use std::fmt;

use chrono::Weekday;

use super::{mode, or_na};
use crate::data::model::{month_name, weekday_name, TripDataset};

pub const TITLE: &str = "Calculating The Most Frequent Times of Travel...";

/// Most frequent start month, weekday and hour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeStats {
    pub month: Option<u32>,
    pub weekday: Option<Weekday>,
    pub start_hour: Option<u32>,
}

pub fn compute(dataset: &TripDataset) -> TimeStats {
    let records = dataset.records();
    TimeStats {
        month: mode(records.iter().map(|r| r.month())),
        weekday: mode(records.iter().map(|r| r.weekday())),
        start_hour: mode(records.iter().map(|r| r.start_hour())),
    }
}

impl fmt::Display for TimeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Month:\t{}\n", or_na(self.month.and_then(month_name)))?;
        writeln!(f, "Day:\t{}\n", or_na(self.weekday.map(weekday_name)))?;
        writeln!(
            f,
            "Most Frequent Hour of the Day:\t{}",
            or_na(self.start_hour.map(|h| format!("{h}.00")))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{trip, ts};
    use crate::data::model::City;

    #[test]
    fn picks_most_frequent_times() {
        let ds = TripDataset::from_trips(
            City::Chicago,
            vec![
                trip(ts(2017, 6, 5, 17, 0), "A", "B"),  // Mon
                trip(ts(2017, 6, 6, 17, 30), "A", "B"), // Tue
                trip(ts(2017, 1, 2, 8, 0), "A", "B"),   // Mon
                trip(ts(2017, 6, 12, 9, 0), "A", "B"),  // Mon
            ],
        );
        let stats = compute(&ds);
        assert_eq!(stats.month, Some(6));
        assert_eq!(stats.weekday, Some(Weekday::Mon));
        assert_eq!(stats.start_hour, Some(17));

        let text = stats.to_string();
        assert!(text.contains("Month:\tJune"));
        assert!(text.contains("Day:\tMonday"));
        assert!(text.contains("Most Frequent Hour of the Day:\t17.00"));
    }

    #[test]
    fn ties_go_to_first_row() {
        let ds = TripDataset::from_trips(
            City::Chicago,
            vec![
                trip(ts(2017, 3, 7, 10, 0), "A", "B"), // Tue
                trip(ts(2017, 2, 6, 11, 0), "A", "B"), // Mon
            ],
        );
        let stats = compute(&ds);
        assert_eq!(stats.month, Some(3));
        assert_eq!(stats.weekday, Some(Weekday::Tue));
        assert_eq!(stats.start_hour, Some(10));
    }

    #[test]
    fn empty_dataset_prints_placeholders() {
        let stats = compute(&TripDataset::from_trips(City::Chicago, Vec::new()));
        assert_eq!(
            stats,
            TimeStats {
                month: None,
                weekday: None,
                start_hour: None
            }
        );
        assert!(stats.to_string().contains("Month:\tn/a"));
    }
}
