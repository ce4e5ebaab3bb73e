//! Run configuration.
//!
//! # Delays
//!
//! Riders pause for real wall-clock time: `wait_delay_ms` after a failed
//! attempt (no bike / no slot at the chosen station) and `step_delay_ms` after
//! a successful take or return.  Both default to 100 ms.  Wait time reported
//! in the results is the nominal `wait_delay` summed once per failed attempt,
//! so it is exact and independent of scheduler jitter.

use std::time::Duration;

use crate::{CoreError, CoreResult};

/// Default pause, in milliseconds, for both delays.
pub const DEFAULT_DELAY_MS: u64 = 100;

/// Top-level simulation configuration.
///
/// Population and goal parameters (rider count, paths per rider, goal
/// station) are set on the simulation builder; this struct holds what stays
/// the same across scenarios.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Master RNG seed for per-rider station picks.
    pub seed: u64,

    /// Worker thread count for the rider pool.  `None` gives one worker per
    /// rider.  Riders block their worker while they sleep, so an explicit
    /// count below the rider count is rejected when the simulation is built.
    pub num_threads: Option<usize>,

    /// Pause after finding no bike / no slot.
    pub wait_delay_ms: u64,

    /// Pause after a successful take or return (models travel time).
    pub step_delay_ms: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed:          0,
            num_threads:   None,
            wait_delay_ms: DEFAULT_DELAY_MS,
            step_delay_ms: DEFAULT_DELAY_MS,
        }
    }
}

impl SimConfig {
    #[inline]
    pub fn wait_delay(&self) -> Duration {
        Duration::from_millis(self.wait_delay_ms)
    }

    #[inline]
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    /// Number of pool workers to use for `rider_count` riders.
    pub fn worker_threads(&self, rider_count: usize) -> usize {
        self.num_threads.unwrap_or(rider_count).max(1)
    }

    /// Reject settings that cannot produce a run.
    pub fn validate(&self) -> CoreResult<()> {
        if self.num_threads == Some(0) {
            return Err(CoreError::Config("num_threads must be at least 1".into()));
        }
        Ok(())
    }
}
