//! Plain data row types written by output backends.

use cb_rider::{SimulationResult, StepEvent};

/// One rider step: a take, a return, or a wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRow<'a> {
    pub rider_id:   u32,
    pub station_id: &'a str,
    /// `took_bike`, `returned_bike`, `waited_for_bike` or `waited_for_slot`.
    pub action:     &'static str,
    pub free_bikes: u32,
    pub free_slots: u32,
}

impl<'a> From<&StepEvent<'a>> for StepRow<'a> {
    fn from(event: &StepEvent<'a>) -> Self {
        Self {
            rider_id:   event.rider.0,
            station_id: event.station_id,
            action:     event.action.as_str(),
            free_bikes: event.counts.free_bikes,
            free_slots: event.counts.free_slots,
        }
    }
}

/// One rider's final result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiderRow {
    pub rider_id:        u32,
    pub wait_secs:       f64,
    pub paths_completed: u32,
    pub stopped_early:   bool,
    pub holding_bike:    bool,
}

impl From<&SimulationResult> for RiderRow {
    fn from(result: &SimulationResult) -> Self {
        Self {
            rider_id:        result.rider.0,
            wait_secs:       result.wait_time.as_secs_f64(),
            paths_completed: result.paths_completed,
            stopped_early:   result.stopped_early,
            holding_bike:    result.holding_bike,
        }
    }
}
