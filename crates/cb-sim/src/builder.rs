//! Fluent builder for constructing a [`Simulation`].

use cb_core::SimConfig;
use cb_rider::StopSignal;
use cb_station::StationSet;

use crate::{SimError, SimResult, Simulation};

/// Fluent builder for [`Simulation`].
///
/// # Required inputs
///
/// - [`SimConfig`]: seed, worker threads (at least one per rider), delays
/// - [`StationSet`]: must be non-empty
/// - `.riders(n)` and `.paths_per_rider(p)`: both must be positive
///
/// # Optional inputs
///
/// | Method        | Default                                   |
/// |---------------|-------------------------------------------|
/// | `.goal(id)`   | No goal: every rider runs its full budget |
///
/// # Example
///
/// ```rust,ignore
/// let sim = SimBuilder::new(SimConfig::default(), stations)
///     .riders(50)
///     .paths_per_rider(10)
///     .goal("b5262607c8a44db673b2f9acd3ddeede")
///     .build()?;
/// let report = sim.run(&NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:          SimConfig,
    stations:        StationSet,
    riders:          usize,
    paths_per_rider: u32,
    goal:            Option<String>,
}

impl SimBuilder {
    pub fn new(config: SimConfig, stations: StationSet) -> Self {
        Self {
            config,
            stations,
            riders:          0,
            paths_per_rider: 0,
            goal:            None,
        }
    }

    /// Number of concurrent riders.
    pub fn riders(mut self, riders: usize) -> Self {
        self.riders = riders;
        self
    }

    /// Paths each rider completes unless the run is stopped first.
    pub fn paths_per_rider(mut self, paths: u32) -> Self {
        self.paths_per_rider = paths;
        self
    }

    /// Stop the whole run the first time any rider docks at station `id`.
    pub fn goal(mut self, id: impl Into<String>) -> Self {
        self.goal = Some(id.into());
        self
    }

    /// Like [`goal`](Self::goal) but accepts an optional id.
    pub fn maybe_goal(mut self, id: Option<impl Into<String>>) -> Self {
        self.goal = id.map(Into::into);
        self
    }

    /// Validate inputs and return a ready-to-run [`Simulation`].
    ///
    /// Nothing runs if validation fails.
    pub fn build(self) -> SimResult<Simulation> {
        self.config.validate()?;

        if self.stations.is_empty() {
            return Err(SimError::Config("station set is empty".into()));
        }
        if self.riders == 0 {
            return Err(SimError::Config("rider count must be positive".into()));
        }
        if u32::try_from(self.riders).is_err() {
            return Err(SimError::Config(format!("rider count {} exceeds u32::MAX", self.riders)));
        }
        if self.paths_per_rider == 0 {
            return Err(SimError::Config("paths per rider must be positive".into()));
        }
        // Each rider occupies a worker for its whole loop, sleeps included.
        if let Some(threads) = self.config.num_threads {
            if threads < self.riders {
                return Err(SimError::Config(format!(
                    "num_threads ({threads}) is below the rider count ({}); every rider needs its own worker",
                    self.riders
                )));
            }
        }

        if let Some(id) = &self.goal {
            if self.stations.position(id).is_none() {
                return Err(SimError::UnknownGoal(id.clone()));
            }
        }

        Ok(Simulation {
            config:          self.config,
            stations:        self.stations,
            rider_count:     self.riders,
            paths_per_rider: self.paths_per_rider,
            goal:            self.goal,
            stop:            StopSignal::new(),
        })
    }
}
