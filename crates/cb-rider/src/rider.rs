//! The rider state machine.

use std::thread;
use std::time::Duration;

use cb_core::{RiderId, RiderRng, SimConfig, StationIdx};
use cb_station::{DockCounts, Station, StationSet};

use crate::{RideError, RideResult, StepAction, StepEvent, StepObserver, StopSignal};

// ── SimulationResult ──────────────────────────────────────────────────────────

/// What one rider hands back to the orchestrator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SimulationResult {
    pub rider:           RiderId,
    /// Nominal wait delay summed over every failed attempt.
    pub wait_time:       Duration,
    pub paths_completed: u32,
    /// The loop ended on the stop signal before the path budget was spent.
    pub stopped_early:   bool,
    /// The rider stopped while carrying a bike (mid-path).
    pub holding_bike:    bool,
}

// ── RideContext ───────────────────────────────────────────────────────────────

/// Read-only inputs shared by every rider of a run.
pub struct RideContext<'a> {
    pub stations:     &'a StationSet,
    pub target_paths: u32,
    /// Docking at any station with this id raises `stop` for the whole run.
    pub goal:         Option<&'a str>,
    pub wait_delay:   Duration,
    pub step_delay:   Duration,
    pub stop:         &'a StopSignal,
    pub observer:     &'a dyn StepObserver,
}

impl<'a> RideContext<'a> {
    /// Context with the delays taken from `config`.
    pub fn new(
        stations:     &'a StationSet,
        target_paths: u32,
        goal:         Option<&'a str>,
        config:       &SimConfig,
        stop:         &'a StopSignal,
        observer:     &'a dyn StepObserver,
    ) -> Self {
        Self {
            stations,
            target_paths,
            goal,
            wait_delay: config.wait_delay(),
            step_delay: config.step_delay(),
            stop,
            observer,
        }
    }
}

// ── Rider ─────────────────────────────────────────────────────────────────────

/// Which resource the rider is looking for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RiderPhase {
    /// Not carrying a bike; looking for a station with a free bike.
    SeekBike,
    /// Carrying a bike; looking for a station with a free slot.
    SeekSlot,
}

/// A simulated bike-share user.
///
/// A rider owns its RNG and counters and borrows the stations; it is moved
/// into its worker and consumed by [`run`](Self::run).
pub struct Rider {
    id:              RiderId,
    has_bike:        bool,
    paths_completed: u32,
    total_wait:      Duration,
    rng:             RiderRng,
}

impl Rider {
    /// A rider without a bike, seeded from the run seed and its id.
    pub fn new(id: RiderId, run_seed: u64) -> Self {
        Self {
            id,
            has_bike:        false,
            paths_completed: 0,
            total_wait:      Duration::ZERO,
            rng:             RiderRng::new(run_seed, id),
        }
    }

    pub fn id(&self) -> RiderId {
        self.id
    }

    pub fn has_bike(&self) -> bool {
        self.has_bike
    }

    pub fn paths_completed(&self) -> u32 {
        self.paths_completed
    }

    pub fn total_wait(&self) -> Duration {
        self.total_wait
    }

    pub fn phase(&self) -> RiderPhase {
        if self.has_bike { RiderPhase::SeekSlot } else { RiderPhase::SeekBike }
    }

    /// Run the loop until the path budget is spent or `ctx.stop` is raised.
    ///
    /// A station invariant error ends the loop immediately, raises the stop
    /// signal so the rest of the run winds down, and is returned to the
    /// caller.
    pub fn run(mut self, ctx: &RideContext<'_>) -> RideResult<SimulationResult> {
        while self.paths_completed < ctx.target_paths && !ctx.stop.is_raised() {
            if let Err(e) = self.step(ctx) {
                ctx.stop.raise();
                return Err(e);
            }
        }

        let result = SimulationResult {
            rider:           self.id,
            wait_time:       self.total_wait,
            paths_completed: self.paths_completed,
            stopped_early:   self.paths_completed < ctx.target_paths,
            holding_bike:    self.has_bike,
        };
        ctx.observer.on_rider_finished(&result);
        Ok(result)
    }

    /// One loop iteration: pick a station, then take/return or wait.
    pub fn step(&mut self, ctx: &RideContext<'_>) -> RideResult<()> {
        let idx = self.rng.pick_station(ctx.stations.len());
        let station = ctx.stations.get(idx);
        let phase = self.phase();

        let attempt = match phase {
            RiderPhase::SeekBike => station.try_take_bike(),
            RiderPhase::SeekSlot => station.try_return_bike(),
        };
        let rider = self.id;
        let attempt = attempt.map_err(|source| RideError::Station { rider, source })?;

        match (phase, attempt) {
            (RiderPhase::SeekBike, Some(counts)) => {
                self.has_bike = true;
                self.emit(ctx, idx, station, StepAction::TookBike, counts);
                pause(ctx.step_delay);
            }
            (RiderPhase::SeekSlot, Some(counts)) => {
                self.has_bike = false;
                self.emit(ctx, idx, station, StepAction::ReturnedBike, counts);
                pause(ctx.step_delay);
                self.paths_completed += 1;

                if ctx.goal == Some(station.id()) && ctx.stop.raise_for_goal(self.id) {
                    ctx.observer.on_goal_reached(self.id, station.id());
                }
            }
            (RiderPhase::SeekBike, None) => self.wait(ctx, idx, station, StepAction::WaitedForBike),
            (RiderPhase::SeekSlot, None) => self.wait(ctx, idx, station, StepAction::WaitedForSlot),
        }
        Ok(())
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn wait(&mut self, ctx: &RideContext<'_>, idx: StationIdx, station: &Station, action: StepAction) {
        self.emit(ctx, idx, station, action, station.counts());
        pause(ctx.wait_delay);
        self.total_wait += ctx.wait_delay;
    }

    fn emit(
        &self,
        ctx:     &RideContext<'_>,
        idx:     StationIdx,
        station: &Station,
        action:  StepAction,
        counts:  DockCounts,
    ) {
        ctx.observer.on_step(&StepEvent {
            rider: self.id,
            station: idx,
            station_id: station.id(),
            action,
            counts,
        });
    }
}

/// Sleep the rider's thread; zero delays skip the syscall.
#[inline]
fn pause(delay: Duration) {
    if !delay.is_zero() {
        thread::sleep(delay);
    }
}
