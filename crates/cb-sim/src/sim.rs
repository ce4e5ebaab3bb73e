//! The `Simulation` struct and its fan-out/fan-in run.

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use cb_core::{RiderId, SimConfig};
use cb_rider::{
    NoopObserver, RideContext, RideError, Rider, SimulationResult, StepObserver, StopSignal,
};
use cb_station::StationSet;
use rayon::prelude::*;

use crate::{SimBuilder, SimError, SimReport, SimResult};

/// How one rider task ended.
enum RiderOutcome {
    Finished(SimulationResult),
    Failed(RideError),
    Panicked,
}

/// A validated run, ready to start.  Construct via [`SimBuilder`].
///
/// The station set is owned here and shared by reference with every rider;
/// [`stations`](Self::stations) exposes the final counts after a run.
pub struct Simulation {
    pub(crate) config:          SimConfig,
    pub(crate) stations:        StationSet,
    pub(crate) rider_count:     usize,
    pub(crate) paths_per_rider: u32,
    pub(crate) goal:            Option<String>,
    pub(crate) stop:            StopSignal,
}

impl Simulation {
    pub fn stations(&self) -> &StationSet {
        &self.stations
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn rider_count(&self) -> usize {
        self.rider_count
    }

    pub fn paths_per_rider(&self) -> u32 {
        self.paths_per_rider
    }

    /// Id of the goal station, if the run has one.
    pub fn goal_id(&self) -> Option<&str> {
        self.goal.as_deref()
    }

    /// A clone of the run's stop signal.
    ///
    /// Raising it from any thread makes every rider leave its loop at the
    /// next check; [`run`](Self::run) then returns a report with the
    /// interrupted riders marked `stopped_early`.
    pub fn stop_handle(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Start every rider concurrently and block until all of them have stopped.
    ///
    /// Riders run as Rayon jobs on a pool sized by
    /// [`SimConfig::worker_threads`], which the builder guarantees is at
    /// least the rider count, so every rider is live at once.  A rider that
    /// panics is logged, raises the stop signal, and is counted in
    /// [`SimReport::failed_riders`].
    ///
    /// # Errors
    ///
    /// - [`SimError::ThreadPool`] if the worker pool cannot be started.
    /// - [`SimError::Invariant`] if any rider hit a station invariant error.
    ///   The run is wound down first, so the error is returned only once
    ///   every rider has stopped.
    pub fn run<O: StepObserver>(&self, observer: &O) -> SimResult<SimReport> {
        let workers = self.config.worker_threads(self.rider_count);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("rider-{i}"))
            .build()?;

        let span = tracing::info_span!(
            "simulation",
            riders   = self.rider_count,
            paths    = self.paths_per_rider,
            stations = self.stations.len(),
        );
        let _guard = span.enter();
        tracing::info!(
            workers,
            seed       = self.config.seed,
            goal       = self.goal_id().unwrap_or("-"),
            free_bikes = self.stations.total_free_bikes(),
            "starting riders"
        );

        let ctx = RideContext::new(
            &self.stations,
            self.paths_per_rider,
            self.goal_id(),
            &self.config,
            &self.stop,
            observer,
        );
        let seed = self.config.seed;
        // Bounded by the builder.
        let riders = self.rider_count as u32;

        let started = Instant::now();
        let outcomes: Vec<RiderOutcome> = pool.install(|| {
            (0..riders)
                .into_par_iter()
                .with_max_len(1)
                .map(|i| run_rider(Rider::new(RiderId(i), seed), &ctx))
                .collect()
        });
        let elapsed = started.elapsed();

        self.fan_in(outcomes, elapsed)
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn fan_in(&self, outcomes: Vec<RiderOutcome>, elapsed: std::time::Duration) -> SimResult<SimReport> {
        let mut report = SimReport::new(self.rider_count, self.paths_per_rider);
        let mut first_failure = None;

        for outcome in outcomes {
            match outcome {
                RiderOutcome::Finished(result) => report.record(result),
                RiderOutcome::Failed(err) => {
                    first_failure.get_or_insert(err);
                }
                RiderOutcome::Panicked => report.failed_riders += 1,
            }
        }
        report.goal_reached_by = self.stop.goal_winner();
        report.elapsed = elapsed;

        if let Some(RideError::Station { rider, source }) = first_failure {
            tracing::error!(%rider, error = %source, "run aborted on station invariant");
            return Err(SimError::Invariant { rider, source });
        }

        tracing::info!(
            paths         = report.total_paths_completed,
            expected      = report.expected_paths(),
            wait_secs     = report.total_wait_secs(),
            stopped_early = report.stopped_early,
            failed        = report.failed_riders,
            goal_reached  = report.goal_reached(),
            elapsed_ms    = report.elapsed.as_millis() as u64,
            "run finished"
        );
        Ok(report)
    }
}

/// Run one rider to completion, converting a panic into an outcome.
fn run_rider(rider: Rider, ctx: &RideContext<'_>) -> RiderOutcome {
    let id = rider.id();
    match panic::catch_unwind(AssertUnwindSafe(|| rider.run(ctx))) {
        Ok(Ok(result)) => RiderOutcome::Finished(result),
        Ok(Err(err)) => {
            tracing::warn!(rider = %id, error = %err, "rider stopped on error");
            RiderOutcome::Failed(err)
        }
        Err(_) => {
            tracing::error!(rider = %id, "rider panicked, stopping run");
            ctx.stop.raise();
            RiderOutcome::Panicked
        }
    }
}

/// Build and run a simulation with default configuration and no observer.
///
/// `goal`, if given, must match a station id in `stations`.
pub fn run_simulation(
    stations:        StationSet,
    rider_count:     usize,
    paths_per_rider: u32,
    goal:            Option<&str>,
) -> SimResult<SimReport> {
    SimBuilder::new(SimConfig::default(), stations)
        .riders(rider_count)
        .paths_per_rider(paths_per_rider)
        .maybe_goal(goal)
        .build()?
        .run(&NoopObserver)
}
