use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::Result;
use log::debug;

use super::report::SEPARATOR;
use crate::data::model::{City, DayFilter, FilterCriteria, MonthFilter};
use crate::error::BikeshareError;

const GREETING: &str = "Hello! Let's explore some US bikeshare data!\n\n";
const CITY_PROMPT: &str = "Enter a city name (e.g. chicago, new york city or washington)\nCity:\t";
const MONTH_PROMPT: &str = "\n\nEnter a month name (e.g. all, January, February, March etc.)\nMonth:\t";
const DAY_PROMPT: &str = "\n\nEnter the day of the week (e.g. all, Monday, Tuesday etc.)\nDay:\t";
const RESTART_PROMPT: &str = "\nWould you like to restart? Enter yes or no.\n";

// ---------------------------------------------------------------------------
// Prompter – blocking line-oriented terminal input
// ---------------------------------------------------------------------------

/// Reads answers from `input` and writes prompts (and everything else the
/// session prints) to `out`.
pub struct Prompter<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    /// The output stream, shared with the report printer.
    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }

    /// One line without its terminator; `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
    }

    /// Prompt until the answer parses as `T`. There is no retry limit.
    fn ask<T: FromStr>(&mut self, prompt: &str, waiting_for: &'static str) -> Result<T> {
        loop {
            write!(self.out, "{prompt}")?;
            self.out.flush()?;

            let line = self
                .read_line()?
                .ok_or(BikeshareError::InputClosed(waiting_for))?;

            match line.parse::<T>() {
                Ok(value) => {
                    writeln!(self.out, "\n\nYou Entered: {line}")?;
                    return Ok(value);
                }
                Err(_) => {
                    debug!("Rejected {waiting_for} input {line:?}");
                    writeln!(self.out, "\nInvalid Input! Please try again:")?;
                }
            }
        }
    }

    /// Ask for city, month and day in that order.
    pub fn collect_filters(&mut self) -> Result<FilterCriteria> {
        write!(self.out, "{GREETING}")?;

        let city: City = self.ask(CITY_PROMPT, "a city")?;
        let month: MonthFilter = self.ask(MONTH_PROMPT, "a month")?;
        let day: DayFilter = self.ask(DAY_PROMPT, "a day of week")?;

        writeln!(self.out, "{SEPARATOR}")?;
        Ok(FilterCriteria { city, month, day })
    }

    /// Only `yes` (any case) restarts. End of input counts as no.
    pub fn ask_restart(&mut self) -> Result<bool> {
        write!(self.out, "{RESTART_PROMPT}")?;
        self.out.flush()?;
        Ok(self
            .read_line()?
            .is_some_and(|answer| answer.eq_ignore_ascii_case("yes")))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use chrono::Weekday;

    use super::*;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(p: &Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(p.out.clone()).unwrap()
    }

    #[test]
    fn collects_valid_filters() {
        let mut p = prompter("chicago\nMarch\nMonday\n");
        let criteria = p.collect_filters().unwrap();
        assert_eq!(
            criteria,
            FilterCriteria {
                city: City::Chicago,
                month: MonthFilter::Month(3),
                day: DayFilter::Day(Weekday::Mon),
            }
        );

        let out = output(&p);
        assert!(out.starts_with(GREETING));
        assert!(out.contains("You Entered: chicago"));
        assert!(out.contains("You Entered: March"));
        assert!(out.contains("You Entered: Monday"));
        assert!(!out.contains("Invalid Input"));
    }

    #[test]
    fn unsupported_city_reprompts_until_valid() {
        let mut p = prompter("boston\nChicago\nnew york city\nall\nall\n");
        let criteria = p.collect_filters().unwrap();
        assert_eq!(criteria.city, City::NewYorkCity);

        let out = output(&p);
        assert_eq!(out.matches("Invalid Input! Please try again:").count(), 2);
        assert_eq!(out.matches("City:\t").count(), 3);
    }

    #[test]
    fn month_and_day_need_calendar_capitalisation() {
        let mut p = prompter("washington\njune\nJune\nfriday\nall\n");
        let criteria = p.collect_filters().unwrap();
        assert_eq!(criteria.month, MonthFilter::Month(6));
        assert_eq!(criteria.day, DayFilter::All);
        assert_eq!(output(&p).matches("Invalid Input!").count(), 2);
    }

    #[test]
    fn windows_line_endings_are_accepted() {
        let mut p = prompter("washington\r\nall\r\nSunday\r\n");
        let criteria = p.collect_filters().unwrap();
        assert_eq!(criteria.day, DayFilter::Day(Weekday::Sun));
    }

    #[test]
    fn closed_input_is_an_error_not_a_spin() {
        let mut p = prompter("boston\n");
        let err = p.collect_filters().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BikeshareError>(),
            Some(BikeshareError::InputClosed("a city"))
        ));
    }

    #[test]
    fn restart_only_on_yes() {
        for (answer, expected) in [
            ("yes\n", true),
            ("YES\n", true),
            ("Yes\n", true),
            ("no\n", false),
            ("y\n", false),
            (" yes\n", false),
            ("", false),
        ] {
            assert_eq!(prompter(answer).ask_restart().unwrap(), expected, "{answer:?}");
        }
    }
}
