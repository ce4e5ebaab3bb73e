//! The `OutputWriter` trait implemented by backend writers.

use crate::{OutputResult, RiderRow, StepRow};

/// A sink for step and rider rows.
///
/// Writers are driven from rider threads through [`StepLogObserver`], which
/// serialises access, so implementations need `Send` but not `Sync`.
///
/// [`StepLogObserver`]: crate::StepLogObserver
pub trait OutputWriter: Send {
    /// Write one rider step.
    fn write_step(&mut self, row: &StepRow<'_>) -> OutputResult<()>;

    /// Write one rider's final result.
    fn write_rider(&mut self, row: &RiderRow) -> OutputResult<()>;

    /// Flush all underlying handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
