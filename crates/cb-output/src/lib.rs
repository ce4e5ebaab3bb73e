//! `cb-output`: run output writers for the concurrent_bikes simulator.
//!
//! | Backend | Files created              |
//! |---------|----------------------------|
//! | CSV     | `steps.csv`, `riders.csv`  |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`StepLogObserver`], which implements `cb_rider::StepObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use cb_output::{CsvWriter, StepLogObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let obs = StepLogObserver::new(writer);
//! let report = sim.run(&obs)?;
//! obs.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::StepLogObserver;
pub use row::{RiderRow, StepRow};
pub use writer::OutputWriter;
