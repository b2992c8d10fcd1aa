use super::model::{DayFilter, MonthFilter, TripDataset, TripRecord};

// ---------------------------------------------------------------------------
// Month / weekday predicates over derived fields
// ---------------------------------------------------------------------------

/// Whether a record passes both calendar filters.
///
/// `All` never rejects. Otherwise the record's derived start month / weekday
/// must equal the requested one exactly.
pub fn matches(record: &TripRecord, month: MonthFilter, day: DayFilter) -> bool {
    let month_ok = match month {
        MonthFilter::All => true,
        MonthFilter::Month(m) => record.month() == m,
    };
    let day_ok = match day {
        DayFilter::All => true,
        DayFilter::Day(d) => record.weekday() == d,
    };
    month_ok && day_ok
}

/// Drop records failing the filters. Stable: surviving rows keep source order,
/// and timestamps are never touched.
pub fn apply(dataset: &mut TripDataset, month: MonthFilter, day: DayFilter) {
    if month == MonthFilter::All && day == DayFilter::All {
        return;
    }
    dataset.retain(|r| matches(r, month, day));
}

#[cfg(test)]
mod tests {
    use chrono::Weekday;

    use super::*;
    use crate::data::model::tests::{trip, ts};
    use crate::data::model::City;

    fn sample() -> TripDataset {
        // 2017-01-02 Mon, 2017-03-06 Mon, 2017-03-07 Tue, 2017-06-05 Mon, 2017-03-13 Mon
        TripDataset::from_trips(
            City::Chicago,
            vec![
                trip(ts(2017, 1, 2, 8, 0), "A", "B"),
                trip(ts(2017, 3, 6, 9, 0), "B", "C"),
                trip(ts(2017, 3, 7, 10, 0), "C", "D"),
                trip(ts(2017, 6, 5, 11, 0), "D", "E"),
                trip(ts(2017, 3, 13, 12, 0), "E", "F"),
            ],
        )
    }

    fn filtered(month: MonthFilter, day: DayFilter) -> TripDataset {
        let mut ds = sample();
        apply(&mut ds, month, day);
        ds
    }

    fn stations(ds: &TripDataset) -> Vec<&str> {
        ds.records()
            .iter()
            .map(|r| r.trip().start_station.as_str())
            .collect()
    }

    #[test]
    fn all_all_returns_everything() {
        assert_eq!(filtered(MonthFilter::All, DayFilter::All), sample());
    }

    #[test]
    fn month_filter_keeps_order() {
        let ds = filtered(MonthFilter::Month(3), DayFilter::All);
        assert_eq!(stations(&ds), ["B", "C", "E"]);
    }

    #[test]
    fn day_filter_keeps_order() {
        let ds = filtered(MonthFilter::All, DayFilter::Day(Weekday::Mon));
        assert_eq!(stations(&ds), ["A", "B", "D", "E"]);
    }

    #[test]
    fn combined_filters_intersect() {
        let ds = filtered(MonthFilter::Month(3), DayFilter::Day(Weekday::Mon));
        assert_eq!(stations(&ds), ["B", "E"]);
    }

    #[test]
    fn filtered_rows_are_an_ordered_subset() {
        let full = sample();
        let ds = filtered(MonthFilter::Month(3), DayFilter::Day(Weekday::Mon));
        let mut cursor = full.records().iter();
        for rec in ds.records() {
            assert!(cursor.any(|r| r == rec), "{rec:?} out of order or missing");
        }
    }

    #[test]
    fn filtering_is_idempotent() {
        let month = MonthFilter::Month(3);
        let day = DayFilter::Day(Weekday::Mon);
        let once = filtered(month, day);
        let mut twice = once.clone();
        apply(&mut twice, month, day);
        assert_eq!(once, twice);
    }

    #[test]
    fn no_match_yields_empty() {
        let ds = filtered(MonthFilter::Month(12), DayFilter::All);
        assert!(ds.is_empty());
    }

    #[test]
    fn redundant_filters_agree_when_data_is_homogeneous() {
        // Every trip on a Monday in March.
        let only_march_mondays = || {
            TripDataset::from_trips(
                City::NewYorkCity,
                vec![
                    trip(ts(2017, 3, 6, 7, 0), "X", "Y"),
                    trip(ts(2017, 3, 13, 8, 0), "Y", "Z"),
                    trip(ts(2017, 3, 20, 9, 0), "Z", "X"),
                ],
            )
        };
        let run = |month, day| {
            let mut ds = only_march_mondays();
            apply(&mut ds, month, day);
            ds
        };

        let a = run(MonthFilter::All, DayFilter::Day(Weekday::Mon));
        let b = run(MonthFilter::Month(3), DayFilter::Day(Weekday::Mon));
        let c = run(MonthFilter::Month(3), DayFilter::All);
        assert_eq!(a.len(), 3);
        assert_eq!(a, b);
        assert_eq!(b, c);
    }
}
