//! Step observer: the side channel for progress logging and data collection.
//!
//! Observers see every rider step but cannot influence the run: they get
//! shared references only and their methods return nothing.

use std::fmt;

use cb_core::{RiderId, StationIdx};
use cb_station::DockCounts;

use crate::SimulationResult;

/// What a rider did on one loop iteration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StepAction {
    TookBike,
    ReturnedBike,
    /// No bike at the chosen station; the rider waited.
    WaitedForBike,
    /// No free slot at the chosen station; the rider waited.
    WaitedForSlot,
}

impl StepAction {
    pub fn as_str(self) -> &'static str {
        match self {
            StepAction::TookBike      => "took_bike",
            StepAction::ReturnedBike  => "returned_bike",
            StepAction::WaitedForBike => "waited_for_bike",
            StepAction::WaitedForSlot => "waited_for_slot",
        }
    }

    pub fn is_wait(self) -> bool {
        matches!(self, StepAction::WaitedForBike | StepAction::WaitedForSlot)
    }
}

impl fmt::Display for StepAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rider step.
///
/// For takes and returns `counts` are the station's counters right after the
/// mutation; for waits they are read just after the failed attempt.
#[derive(Copy, Clone, Debug)]
pub struct StepEvent<'a> {
    pub rider:      RiderId,
    pub station:    StationIdx,
    pub station_id: &'a str,
    pub action:     StepAction,
    pub counts:     DockCounts,
}

/// Callbacks invoked from rider threads.
///
/// Riders run concurrently, so implementations must be `Send + Sync` and are
/// called through `&self`; use interior mutability for any state.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: count waits
///
/// ```rust,ignore
/// struct WaitCounter(AtomicUsize);
///
/// impl StepObserver for WaitCounter {
///     fn on_step(&self, event: &StepEvent<'_>) {
///         if event.action.is_wait() {
///             self.0.fetch_add(1, Ordering::Relaxed);
///         }
///     }
/// }
/// ```
pub trait StepObserver: Send + Sync {
    /// Called after every take, return, or wait.
    fn on_step(&self, _event: &StepEvent<'_>) {}

    /// Called once per run, by the first rider to dock at the goal station.
    fn on_goal_reached(&self, _rider: RiderId, _station_id: &str) {}

    /// Called when a rider's loop ends, on the rider's own thread.
    fn on_rider_finished(&self, _result: &SimulationResult) {}
}

/// A [`StepObserver`] that does nothing.
pub struct NoopObserver;

impl StepObserver for NoopObserver {}

/// A [`StepObserver`] that emits `tracing` events: steps at `DEBUG`, rider
/// completion at `DEBUG`, the goal at `INFO`.
pub struct TracingObserver;

impl StepObserver for TracingObserver {
    fn on_step(&self, event: &StepEvent<'_>) {
        tracing::debug!(
            rider      = event.rider.0,
            station    = event.station_id,
            action     = %event.action,
            free_bikes = event.counts.free_bikes,
            free_slots = event.counts.free_slots,
            "step"
        );
    }

    fn on_goal_reached(&self, rider: RiderId, station_id: &str) {
        tracing::info!(rider = rider.0, station = station_id, "goal reached, stopping run");
    }

    fn on_rider_finished(&self, result: &SimulationResult) {
        tracing::debug!(
            rider         = result.rider.0,
            paths         = result.paths_completed,
            wait_secs     = result.wait_time.as_secs_f64(),
            stopped_early = result.stopped_early,
            "rider finished"
        );
    }
}
