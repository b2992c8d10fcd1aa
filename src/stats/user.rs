use std::fmt;

use super::{mode, or_na, value_counts_desc};
use crate::data::model::TripDataset;

pub const TITLE: &str = "Calculating User Stats...";

/// Gender and birth-year breakdown, only for cities that publish them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Demographics {
    pub genders: Vec<(String, usize)>,
    pub earliest_birth_year: Option<i64>,
    pub most_recent_birth_year: Option<i64>,
    pub most_common_birth_year: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStats {
    /// Trips per user type, most frequent first. Missing values are skipped.
    pub user_types: Vec<(String, usize)>,
    pub demographics: Option<Demographics>,
}

pub fn compute(dataset: &TripDataset) -> UserStats {
    let trips = || dataset.records().iter().map(|r| r.trip());

    let user_types = value_counts_desc(trips().filter_map(|t| t.user_type.clone()));

    let demographics = dataset.city.has_demographics().then(|| {
        let years = || trips().filter_map(|t| t.birth_year);
        Demographics {
            genders: value_counts_desc(trips().filter_map(|t| t.gender.clone())),
            earliest_birth_year: years().min(),
            most_recent_birth_year: years().max(),
            most_common_birth_year: mode(years()),
        }
    });

    UserStats {
        user_types,
        demographics,
    }
}

fn write_counts(f: &mut fmt::Formatter<'_>, label: &str, counts: &[(String, usize)]) -> fmt::Result {
    writeln!(f, "{label}:")?;
    for (value, n) in counts {
        writeln!(f, "{value}\t{n}")?;
    }
    writeln!(f)
}

impl fmt::Display for UserStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_counts(f, "User Type Counts", &self.user_types)?;

        if let Some(d) = &self.demographics {
            write_counts(f, "Gender Counts", &d.genders)?;
            writeln!(f, "Earliest Birth Year:\t{}\n", or_na(d.earliest_birth_year))?;
            writeln!(f, "Most Recent Birth Year:\t{}\n", or_na(d.most_recent_birth_year))?;
            writeln!(f, "Most Common Birth Year:\t{}", or_na(d.most_common_birth_year))?;
        }
        Ok(())
    }
}
