//! `StepLogObserver<W>`: bridges `StepObserver` to an `OutputWriter`.

use std::sync::{Mutex, MutexGuard, PoisonError};

use cb_rider::{SimulationResult, StepEvent, StepObserver};

use crate::row::{RiderRow, StepRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

struct LogState<W> {
    writer:     W,
    rows:       u64,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> LogState<W> {
    fn store_err(&mut self, result: OutputResult<()>) {
        match result {
            Ok(()) => self.rows += 1,
            // Keep only the first error.
            Err(e) => {
                if self.last_error.is_none() {
                    self.last_error = Some(e);
                }
            }
        }
    }
}

/// A [`StepObserver`] that writes every step and every rider result to any
/// [`OutputWriter`] backend.
///
/// Riders call in from many threads, so the writer sits behind a mutex.
/// Errors are stored internally because `StepObserver` methods have no return
/// value; after `sim.run()` returns, call [`finish`][Self::finish] or
/// [`take_error`][Self::take_error].
pub struct StepLogObserver<W: OutputWriter> {
    state:         Mutex<LogState<W>>,
    include_waits: bool,
}

impl<W: OutputWriter> StepLogObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            state: Mutex::new(LogState {
                writer,
                rows:       0,
                last_error: None,
            }),
            include_waits: true,
        }
    }

    /// Drop `waited_for_*` rows; takes, returns and rider rows are kept.
    pub fn without_waits(mut self) -> Self {
        self.include_waits = false;
        self
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&self) -> Option<OutputError> {
        self.lock().last_error.take()
    }

    /// Rows successfully handed to the writer so far.
    pub fn rows_written(&self) -> u64 {
        self.lock().rows
    }

    /// Flush the writer, then report the first error seen during the run.
    pub fn finish(&self) -> OutputResult<()> {
        let mut state = self.lock();
        let flushed = state.writer.finish();
        match state.last_error.take() {
            Some(e) => Err(e),
            None => flushed,
        }
    }

    /// Unwrap the inner writer (e.g. to inspect rows after the run).
    pub fn into_writer(self) -> W {
        self.state.into_inner().unwrap_or_else(PoisonError::into_inner).writer
    }

    fn lock(&self) -> MutexGuard<'_, LogState<W>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: OutputWriter> StepObserver for StepLogObserver<W> {
    fn on_step(&self, event: &StepEvent<'_>) {
        if !self.include_waits && event.action.is_wait() {
            return;
        }
        let mut state = self.lock();
        let result = state.writer.write_step(&StepRow::from(event));
        state.store_err(result);
    }

    fn on_rider_finished(&self, result: &SimulationResult) {
        let mut state = self.lock();
        let written = state.writer.write_rider(&RiderRow::from(result));
        state.store_err(written);
    }
}
