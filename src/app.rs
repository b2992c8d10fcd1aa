use std::io::{BufRead, Write};

use anyhow::Result;
use log::info;

use crate::config::Config;
use crate::data::loader;
use crate::data::model::FilterCriteria;
use crate::stats::{duration, station, time, user};
use crate::ui::prompt::Prompter;
use crate::ui::report::{self, SEPARATOR};

// ---------------------------------------------------------------------------
// Interactive session
// ---------------------------------------------------------------------------

pub struct BikeshareApp<R, W> {
    config: Config,
    prompter: Prompter<R, W>,
}

impl<R: BufRead, W: Write> BikeshareApp<R, W> {
    pub fn new(config: Config, input: R, out: W) -> Self {
        Self {
            config,
            prompter: Prompter::new(input, out),
        }
    }

    /// Prompt → load → report, until the user declines to restart.
    pub fn run(&mut self) -> Result<()> {
        let mut iteration = 1;
        loop {
            let criteria = self.prompter.collect_filters()?;
            info!(
                "Session {iteration}: city={} month={} day={}",
                criteria.city, criteria.month, criteria.day
            );
            self.explore(&criteria)?;

            if !self.prompter.ask_restart()? {
                return Ok(());
            }
            iteration += 1;
        }
    }

    /// One pass: the dataset is reloaded from disk every time.
    fn explore(&mut self, criteria: &FilterCriteria) -> Result<()> {
        let dataset = loader::load(&self.config, criteria)?;
        let out = self.prompter.writer();

        writeln!(out, "{}", report::preview(&dataset, self.config.preview_rows)?)?;
        writeln!(out, "{SEPARATOR}\n")?;

        report::timed(out, time::TITLE, || time::compute(&dataset))?;
        report::timed(out, station::TITLE, || station::compute(&dataset))?;
        report::timed(out, duration::TITLE, || duration::compute(&dataset))?;
        report::timed(out, user::TITLE, || user::compute(&dataset))?;
        out.flush()?;
        Ok(())
    }
}
