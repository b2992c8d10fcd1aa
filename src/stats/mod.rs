//! Descriptive statistics over a filtered [`TripDataset`](crate::data::model::TripDataset).
//!
//! Each reporter is a pure `compute(&TripDataset)` returning a value that
//! renders itself through `Display`. Reporters only read the dataset.
//!
//! Every "most frequent" value uses [`mode`]: ties go to the value seen first
//! in row order.
pub mod duration;
pub mod station;
pub mod time;
pub mod user;

use std::collections::HashMap;
use std::hash::Hash;

/// Placeholder printed when a statistic has no value (empty selection).
pub const NOT_AVAILABLE: &str = "n/a";

/// Occurrence counts in first-seen order.
pub fn value_counts<T, I>(values: I) -> Vec<(T, usize)>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut index: HashMap<T, usize> = HashMap::new();
    let mut counts: Vec<(T, usize)> = Vec::new();
    for value in values {
        match index.get(&value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value.clone(), counts.len());
                counts.push((value, 1));
            }
        }
    }
    counts
}

/// Counts by descending frequency. The sort is stable, so equal counts stay
/// in first-seen order.
pub fn value_counts_desc<T, I>(values: I) -> Vec<(T, usize)>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut counts = value_counts(values);
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// The value with the highest count, with its count. Earliest wins ties.
pub fn most_frequent<T>(counts: Vec<(T, usize)>) -> Option<(T, usize)> {
    counts.into_iter().fold(None, |best, (value, n)| match best {
        Some((_, m)) if m >= n => best,
        _ => Some((value, n)),
    })
}

/// Most frequent value, `None` for an empty input.
pub fn mode<T, I>(values: I) -> Option<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    most_frequent(value_counts(values)).map(|(value, _)| value)
}

/// Render an optional statistic, `n/a` when absent.
pub(crate) fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}
