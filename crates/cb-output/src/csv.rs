//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `steps.csv`
//! - `riders.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OutputResult, RiderRow, StepRow};

/// Writes run output to two CSV files.
pub struct CsvWriter {
    steps:    Writer<File>,
    riders:   Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the two CSV files and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut steps = Writer::from_path(dir.join("steps.csv"))?;
        steps.write_record(["rider_id", "station_id", "action", "free_bikes", "free_slots"])?;

        let mut riders = Writer::from_path(dir.join("riders.csv"))?;
        riders.write_record(["rider_id", "wait_secs", "paths_completed", "stopped_early", "holding_bike"])?;

        Ok(Self {
            steps,
            riders,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_step(&mut self, row: &StepRow<'_>) -> OutputResult<()> {
        self.steps.write_record([
            row.rider_id.to_string().as_str(),
            row.station_id,
            row.action,
            row.free_bikes.to_string().as_str(),
            row.free_slots.to_string().as_str(),
        ])?;
        Ok(())
    }

    fn write_rider(&mut self, row: &RiderRow) -> OutputResult<()> {
        self.riders.write_record(&[
            row.rider_id.to_string(),
            format!("{:.3}", row.wait_secs),
            row.paths_completed.to_string(),
            (row.stopped_early as u8).to_string(),
            (row.holding_bike as u8).to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.steps.flush()?;
        self.riders.flush()?;
        Ok(())
    }
}
