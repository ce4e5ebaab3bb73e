//! Fan-in of per-rider results.

use std::fmt;
use std::time::Duration;

use cb_core::RiderId;
use cb_rider::SimulationResult;

/// Aggregate outcome of one [`Simulation::run`](crate::Simulation::run).
#[derive(Clone, Debug, PartialEq)]
pub struct SimReport {
    pub rider_count:           usize,
    pub paths_per_rider:       u32,
    /// Sum of every rider's nominal wait time.
    pub total_wait:            Duration,
    pub total_paths_completed: u64,
    /// First rider to dock at the goal station, if the run had a goal and it
    /// was reached.
    pub goal_reached_by:       Option<RiderId>,
    /// Riders whose loop ended on the stop signal.
    pub stopped_early:         usize,
    /// Riders that stopped while carrying a bike.
    pub mid_path:              usize,
    /// Riders whose task panicked.
    pub failed_riders:         usize,
    /// Wall-clock time from fan-out to fan-in.
    pub elapsed:               Duration,
    /// Per-rider results in rider-id order (panicked riders omitted).
    pub riders:                Vec<SimulationResult>,
}

impl SimReport {
    pub(crate) fn new(rider_count: usize, paths_per_rider: u32) -> Self {
        Self {
            rider_count,
            paths_per_rider,
            total_wait:            Duration::ZERO,
            total_paths_completed: 0,
            goal_reached_by:       None,
            stopped_early:         0,
            mid_path:              0,
            failed_riders:         0,
            elapsed:               Duration::ZERO,
            riders:                Vec::with_capacity(rider_count),
        }
    }

    pub(crate) fn record(&mut self, result: SimulationResult) {
        self.total_wait += result.wait_time;
        self.total_paths_completed += u64::from(result.paths_completed);
        self.stopped_early += usize::from(result.stopped_early);
        self.mid_path += usize::from(result.holding_bike);
        self.riders.push(result);
    }

    pub fn total_wait_secs(&self) -> f64 {
        self.total_wait.as_secs_f64()
    }

    pub fn goal_reached(&self) -> bool {
        self.goal_reached_by.is_some()
    }

    /// `rider_count × paths_per_rider`: the total an uninterrupted run reaches.
    pub fn expected_paths(&self) -> u64 {
        self.rider_count as u64 * u64::from(self.paths_per_rider)
    }

    /// Every rider finished its whole budget.
    pub fn is_complete(&self) -> bool {
        self.total_paths_completed == self.expected_paths()
    }

    /// Mean nominal wait per rider that reported a result.
    pub fn mean_wait(&self) -> Duration {
        match u32::try_from(self.riders.len()) {
            Ok(0) | Err(_) => Duration::ZERO,
            Ok(n) => self.total_wait / n,
        }
    }
}

impl fmt::Display for SimReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "riders          : {}", self.rider_count)?;
        writeln!(
            f,
            "paths completed : {} / {}",
            self.total_paths_completed,
            self.expected_paths()
        )?;
        writeln!(f, "total wait      : {:.3} s", self.total_wait_secs())?;
        writeln!(f, "mean wait       : {:.3} s", self.mean_wait().as_secs_f64())?;
        match self.goal_reached_by {
            Some(rider) => writeln!(f, "goal reached by : {rider}")?,
            None => writeln!(f, "goal reached by : -")?,
        }
        writeln!(
            f,
            "stopped early   : {} ({} mid-path)",
            self.stopped_early, self.mid_path
        )?;
        if self.failed_riders > 0 {
            writeln!(f, "failed riders   : {}", self.failed_riders)?;
        }
        write!(f, "elapsed         : {:.3} s", self.elapsed.as_secs_f64())
    }
}
